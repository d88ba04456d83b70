//! Request payload handling.
//!
//! # Data Flow
//! ```text
//! HTTP request body (stream of frames)
//!     → codec.rs (bounded read, drain remainder, optional JSON check)
//!     → Bytes forwarded unchanged to the bus
//! ```
//!
//! # Design Decisions
//! - At most `max_size` bytes are buffered; the rest is read and discarded
//! - The body is always read to the end so the connection can be reused
//! - Validation never rewrites the payload

pub mod codec;

pub use codec::{drain, PayloadCodec, Validation};

/// Client-side payload faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("missing request body")]
    BodyMissing,

    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("malformed JSON body: {0}")]
    MalformedContent(String),

    #[error("failed to read request body: {0}")]
    Unreadable(String),
}
