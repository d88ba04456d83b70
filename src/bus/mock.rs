//! Mock message bus for testing.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use tokio::sync::{mpsc, Mutex, RwLock};

use super::{BusError, BusMessage, MessageBus, Result, Subscription};

/// How the mock answers `request` calls.
#[derive(Debug, Clone)]
pub enum ReplyMode {
    /// Reply immediately with this body.
    Reply(Bytes),
    /// Never reply; the caller's timeout decides.
    Silent,
    /// Fail with this error.
    Fail(BusError),
}

impl Default for ReplyMode {
    fn default() -> Self {
        ReplyMode::Reply(Bytes::from_static(b"{}"))
    }
}

/// In-memory bus that records traffic.
pub struct MockBus {
    published: RwLock<Vec<(String, Bytes)>>,
    requests: RwLock<Vec<(String, Bytes)>>,
    reply_mode: RwLock<ReplyMode>,
    fail_on_publish: AtomicBool,
    connected: AtomicBool,
    subscribers: Mutex<Vec<(String, mpsc::UnboundedSender<BusMessage>)>>,
}

impl Default for MockBus {
    fn default() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
            requests: RwLock::new(Vec::new()),
            reply_mode: RwLock::new(ReplyMode::default()),
            fail_on_publish: AtomicBool::new(false),
            connected: AtomicBool::new(true),
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mode: ReplyMode) -> Self {
        Self {
            reply_mode: RwLock::new(mode),
            ..Self::default()
        }
    }

    pub async fn set_reply_mode(&self, mode: ReplyMode) {
        *self.reply_mode.write().await = mode;
    }

    pub fn set_fail_on_publish(&self, fail: bool) {
        self.fail_on_publish.store(fail, Ordering::SeqCst);
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub async fn published(&self) -> Vec<(String, Bytes)> {
        self.published.read().await.clone()
    }

    pub async fn published_count(&self) -> usize {
        self.published.read().await.len()
    }

    pub async fn requests(&self) -> Vec<(String, Bytes)> {
        self.requests.read().await.clone()
    }

    /// Deliver `message` to every live subscriber of its subject.
    ///
    /// Returns how many subscribers received it.
    pub async fn inject(&self, message: BusMessage) -> usize {
        let mut subscribers = self.subscribers.lock().await;
        subscribers.retain(|(_, tx)| !tx.is_closed());
        subscribers
            .iter()
            .filter(|(topic, _)| *topic == message.subject)
            .filter(|(_, tx)| tx.send(message.clone()).is_ok())
            .count()
    }

    /// Drop every subscription sender, ending the subscriber streams.
    pub async fn close_subscriptions(&self) {
        self.subscribers.lock().await.clear();
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(BusError::NotConnected)
        }
    }
}

#[async_trait]
impl MessageBus for MockBus {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<()> {
        self.ensure_connected()?;
        if self.fail_on_publish.load(Ordering::SeqCst) {
            return Err(BusError::Publish("mock publish failure".to_string()));
        }
        self.published.write().await.push((topic.to_string(), payload));
        Ok(())
    }

    async fn request(&self, topic: &str, payload: Bytes) -> Result<Bytes> {
        self.ensure_connected()?;
        self.requests.write().await.push((topic.to_string(), payload));
        let mode = self.reply_mode.read().await.clone();
        match mode {
            ReplyMode::Reply(body) => Ok(body),
            ReplyMode::Silent => std::future::pending().await,
            ReplyMode::Fail(e) => Err(e),
        }
    }

    async fn subscribe(&self, topic: &str) -> Result<Subscription> {
        self.ensure_connected()?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().await.push((topic.to_string(), tx));
        Ok(stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|message| (message, rx))
        })
        .boxed())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
