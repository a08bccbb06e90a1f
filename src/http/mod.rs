//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID) → middleware/cors.rs (pre-flight)
//!     → handler.rs (decode, translate, open bridge)
//!     → response.rs (SSE headers, channel-backed body)
//!     → Send to client, one flushed frame per chunk
//! ```

pub mod error;
pub mod handler;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use error::GatewayError;
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use response::{sse_channel, sse_response, ChannelSink};
pub use server::{AppState, GatewayServer};
