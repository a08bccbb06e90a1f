//! Agent RPC subsystem.
//!
//! # Data Flow
//! ```text
//! bridge (OPENING)
//!     → ChatClient::stream_chat (one server-streaming call per HTTP request)
//!     → ChunkSource::recv, repeated by the bridge
//!         Ok(Some(chunk)) → next unit of text
//!         Ok(None)        → end of stream
//!         Err(RpcError)   → stream failed
//! ```
//!
//! # Design Decisions
//! - The bridge only sees the two traits; `AgentClient` is the tonic implementation
//! - The underlying `Channel` is shared and cheap to clone; each call owns its stream
//! - Dropping a `ChunkSource` cancels the call on the agent side

pub mod client;
pub mod types;

pub use client::{AgentClient, BoxChunkSource, ChatClient, ChunkSource};
pub use types::{RpcError, RpcResult};
