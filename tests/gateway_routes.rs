//! End-to-end tests of the HTTP surface over a real socket.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use nats_gateway::bus::{BusError, MockBus, ReplyMode};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn test_publish_scenario() {
    let gateway = common::start_gateway(common::fast_config(), Arc::new(MockBus::new())).await;

    let res = common::client()
        .post(gateway.url("/topics/orders"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"id":1}"#)
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());
    assert_eq!(
        gateway.bus.published().await,
        vec![("orders".to_string(), Bytes::from_static(br#"{"id":1}"#))]
    );
}

#[tokio::test]
async fn test_request_scenario() {
    let bus = Arc::new(MockBus::with_reply(ReplyMode::Reply(Bytes::from_static(
        br#"{"status":"ok"}"#,
    ))));
    let gateway = common::start_gateway(common::fast_config(), bus).await;

    let res = common::client()
        .post(gateway.url("/requests/orders"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"id":1}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(res.text().await.unwrap(), r#"{"status":"ok"}"#);
}

#[tokio::test]
async fn test_request_timeout_scenario() {
    let bus = Arc::new(MockBus::with_reply(ReplyMode::Silent));
    let gateway = common::start_gateway(common::fast_config(), bus).await;

    let start = Instant::now();
    let res = common::client()
        .post(gateway.url("/requests/orders"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"id":1}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(start.elapsed() >= Duration::from_millis(200));
    assert!(res.text().await.unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_reply_behavior_is_read_per_request() {
    let bus = Arc::new(MockBus::with_reply(ReplyMode::Reply(Bytes::from_static(
        br#"{"status":"ok"}"#,
    ))));
    let gateway = common::start_gateway(common::fast_config(), bus.clone()).await;
    let client = common::client();
    let send = || {
        client
            .post(gateway.url("/requests/orders"))
            .header(CONTENT_TYPE, "application/json")
            .body(r#"{"id":1}"#)
            .send()
    };

    assert_eq!(send().await.unwrap().status(), StatusCode::OK);

    bus.set_reply_mode(ReplyMode::Fail(BusError::NoResponders("orders".to_string())))
        .await;
    let res = send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "no responders on topic orders");
    assert_eq!(bus.requests().await.len(), 2);
}

#[tokio::test]
async fn test_empty_topic_segment_is_not_found() {
    let gateway = common::start_gateway(common::fast_config(), Arc::new(MockBus::new())).await;

    let res = common::client()
        .post(gateway.url("/topics/"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"id":1}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(gateway.bus.published_count().await, 0);
}

#[tokio::test]
async fn test_absent_body_is_not_acceptable() {
    let gateway = common::start_gateway(common::fast_config(), Arc::new(MockBus::new())).await;

    let res = common::client()
        .post(gateway.url("/topics/orders"))
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn test_oversized_body_keeps_connection_usable() {
    let gateway = common::start_gateway(common::fast_config(), Arc::new(MockBus::new())).await;
    let client = reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(1)
        .build()
        .unwrap();

    let big = format!(r#"{{"data":"{}"}}"#, "x".repeat(64 * 1024));
    let res = client
        .post(gateway.url("/topics/orders"))
        .header(CONTENT_TYPE, "application/json")
        .body(big)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.text().await.unwrap().contains("exceeds 8192 bytes"));

    // Same pooled client; the first body was drained so this succeeds.
    let res = client
        .post(gateway.url("/topics/orders"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"id":2}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(gateway.bus.published_count().await, 1);
}

#[tokio::test]
async fn test_wrong_content_type_is_rejected() {
    let gateway = common::start_gateway(common::fast_config(), Arc::new(MockBus::new())).await;

    let res = common::client()
        .post(gateway.url("/topics/orders"))
        .header(CONTENT_TYPE, "text/plain")
        .body(r#"{"id":1}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(gateway.bus.published_count().await, 0);
}

#[tokio::test]
async fn test_bus_down_is_server_error() {
    let bus = Arc::new(MockBus::new());
    bus.set_connected(false);
    let gateway = common::start_gateway(common::fast_config(), bus).await;

    let res = common::client()
        .post(gateway.url("/topics/orders"))
        .header(CONTENT_TYPE, "application/json")
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "not connected to message bus");
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let gateway = common::start_gateway(common::fast_config(), Arc::new(MockBus::new())).await;
    let client = common::client();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = gateway.url("/topics/orders");
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(format!(r#"{{"id":{}}}"#, i))
                .send()
                .await
                .map(|res| res.status())
        }));
    }

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), StatusCode::NO_CONTENT);
    }
    assert_eq!(gateway.bus.published_count().await, 20);
}
