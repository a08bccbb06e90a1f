//! Conversation vocabulary shared by both sides of the gateway.
//!
//! # Data Flow
//! ```text
//! POST /api/chat body (JSON)
//!     → model.rs (ChatRequest / ChatMessage, serde)
//!     → translate.rs (index-for-index copy)
//!     → proto.rs (ChatRequest on the agent wire, prost)
//!     → agent StreamChat call
//!     ← proto.rs (ChatResponseChunk stream)
//! ```
//!
//! # Design Decisions
//! - External and internal requests are distinct types; only the encoding differs
//! - Roles are open strings, forwarded unchanged
//! - Nothing here is persisted or cached beyond one HTTP request

pub mod model;
pub mod proto;
pub mod translate;

pub use model::{ChatMessage, ChatRequest};
pub use proto::ChatResponseChunk;
pub use translate::translate;
