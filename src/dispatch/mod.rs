//! Dispatch operations.
//!
//! # Data Flow
//! ```text
//! (Topic, payload)
//!     → operation.rs
//!         Publish: bus.publish → Published
//!         Request: bus.request under deadline → Replied(body) | Timeout
//! ```
//!
//! # Design Decisions
//! - No retries at this layer; one bus failure is one error
//! - The reply deadline is enforced here regardless of the client's own timeout
//! - Operations hold no state between calls

pub mod operation;
pub mod topic;

pub use operation::{Dispatcher, Operation, Outcome};
pub use topic::{RoutingError, Topic};
