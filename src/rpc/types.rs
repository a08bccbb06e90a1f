//! Agent RPC error definitions.

use thiserror::Error;

/// Errors raised while calling the agent or reading its stream.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Configured address is not a usable endpoint URI.
    #[error("invalid agent address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Eager dial of the agent failed.
    #[error("failed to connect to agent at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// Channel could not accept a new call.
    #[error("agent channel not ready: {0}")]
    Unavailable(String),

    /// Agent answered with a non-OK gRPC status.
    #[error("rpc error: code = {:?} desc = {}", .0.code(), .0.message())]
    Status(#[from] tonic::Status),

    /// No chunk arrived within the configured idle window.
    #[error("no chunk received from agent within {0} seconds")]
    IdleTimeout(u64),
}

/// Result type for agent RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
