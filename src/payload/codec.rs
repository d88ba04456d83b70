//! Bounded body reader.

use axum::body::Body;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;

use crate::config::PayloadConfig;
use crate::payload::PayloadError;

/// Structural check applied after the size check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Forward opaque bytes.
    None,
    /// Body must be exactly one JSON document.
    Json,
}

/// Reads request bodies under a size limit.
#[derive(Debug, Clone)]
pub struct PayloadCodec {
    max_size: usize,
    validation: Validation,
}

impl PayloadCodec {
    pub fn new(max_size: usize, validation: Validation) -> Self {
        Self {
            max_size,
            validation,
        }
    }

    pub fn from_config(config: &PayloadConfig) -> Self {
        let validation = if config.validate_json {
            Validation::Json
        } else {
            Validation::None
        };
        Self::new(config.max_body_bytes, validation)
    }

    /// Read the whole body and return it as forwarded to the bus.
    pub async fn decode(&self, body: Body) -> Result<Bytes, PayloadError> {
        let bytes = self.read_bounded(body).await?;
        if self.validation == Validation::Json {
            serde_json::from_slice::<serde::de::IgnoredAny>(&bytes)
                .map_err(|e| PayloadError::MalformedContent(e.to_string()))?;
        }
        Ok(bytes)
    }

    /// Buffer up to `max_size` bytes, then keep reading to the end without
    /// buffering so the connection is left clean.
    async fn read_bounded(&self, body: Body) -> Result<Bytes, PayloadError> {
        let mut stream = body.into_data_stream();
        let mut buf = BytesMut::new();
        let mut overflow = false;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| PayloadError::Unreadable(e.to_string()))?;
            if overflow {
                continue;
            }
            if buf.len() + chunk.len() > self.max_size {
                overflow = true;
                buf = BytesMut::new();
                continue;
            }
            buf.extend_from_slice(&chunk);
        }

        if overflow {
            return Err(PayloadError::BodyTooLarge {
                limit: self.max_size,
            });
        }
        if buf.is_empty() {
            return Err(PayloadError::BodyMissing);
        }
        Ok(buf.freeze())
    }
}

/// Read and discard a body. Returns the number of bytes consumed.
pub async fn drain(body: Body) -> usize {
    let mut stream = body.into_data_stream();
    let mut consumed = 0;
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => consumed += chunk.len(),
            Err(e) => {
                tracing::debug!(error = %e, "Body stream failed while draining");
                break;
            }
        }
    }
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Body made of `chunks`, counting how many were pulled.
    fn counted_body(chunks: Vec<&'static [u8]>) -> (Body, Arc<AtomicUsize>) {
        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = pulled.clone();
        let stream = stream::iter(chunks).map(move |chunk| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, std::io::Error>(Bytes::from_static(chunk))
        });
        (Body::from_stream(stream), pulled)
    }

    #[tokio::test]
    async fn test_decode_returns_original_bytes() {
        let codec = PayloadCodec::new(64, Validation::Json);
        let bytes = codec.decode(Body::from(r#"{"id": 1}"#)).await.unwrap();
        assert_eq!(bytes, Bytes::from_static(br#"{"id": 1}"#));
    }

    #[tokio::test]
    async fn test_empty_body_is_missing() {
        let codec = PayloadCodec::new(64, Validation::None);
        assert_eq!(codec.decode(Body::empty()).await, Err(PayloadError::BodyMissing));
    }

    #[tokio::test]
    async fn test_body_at_limit_is_accepted() {
        let codec = PayloadCodec::new(4, Validation::None);
        let bytes = codec.decode(Body::from("abcd")).await.unwrap();
        assert_eq!(bytes.len(), 4);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected_and_drained() {
        let codec = PayloadCodec::new(4, Validation::None);
        let (body, pulled) = counted_body(vec![b"abc", b"def", b"ghi", b"jkl"]);

        let err = codec.decode(body).await.unwrap_err();
        assert_eq!(err, PayloadError::BodyTooLarge { limit: 4 });
        assert_eq!(pulled.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let codec = PayloadCodec::new(64, Validation::Json);
        let err = codec.decode(Body::from("{not json")).await.unwrap_err();
        assert!(matches!(err, PayloadError::MalformedContent(_)));
    }

    #[tokio::test]
    async fn test_trailing_garbage_is_malformed() {
        let codec = PayloadCodec::new(64, Validation::Json);
        let err = codec.decode(Body::from(r#"{"a":1} {"b":2}"#)).await.unwrap_err();
        assert!(matches!(err, PayloadError::MalformedContent(_)));
    }

    #[tokio::test]
    async fn test_opaque_bytes_skip_validation() {
        let codec = PayloadCodec::new(64, Validation::None);
        let bytes = codec.decode(Body::from("plain text")).await.unwrap();
        assert_eq!(bytes, Bytes::from_static(b"plain text"));
    }

    #[tokio::test]
    async fn test_drain_consumes_everything() {
        let (body, pulled) = counted_body(vec![b"one", b"two", b"three"]);
        assert_eq!(drain(body).await, 11);
        assert_eq!(pulled.load(Ordering::SeqCst), 3);
    }
}
