//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware, graceful shutdown)
//!     → request.rs (request ID, JSON content-type guard)
//!     → handler.rs (topic → payload codec → dispatcher)
//!     → response.rs (outcome / error → status code and body)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::AppState;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::GatewayError;
pub use server::HttpServer;
