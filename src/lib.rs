//! Chat gateway library: JSON chat requests in, agent gRPC stream out,
//! relayed back to the client as Server-Sent Events.

pub mod bridge;
pub mod chat;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rpc;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
