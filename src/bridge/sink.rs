//! Outbound side of the bridge: where SSE frames go.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// The peer stopped reading; nothing more can be delivered.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("event sink closed by peer")]
pub struct SinkClosed;

/// A flush-driven writer for framed events.
///
/// The bridge calls `write_frame` then `flush` once per relayed chunk and
/// waits for both before reading the next chunk.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Whether frames can be pushed to the peer one at a time.
    fn supports_flush(&self) -> bool {
        true
    }

    /// Hand one frame to the transport buffer.
    async fn write_frame(&mut self, frame: Bytes) -> Result<(), SinkClosed>;

    /// Wait until everything written so far has left the buffer.
    async fn flush(&mut self) -> Result<(), SinkClosed>;

    /// Resolve once the peer has gone away.
    async fn closed(&self);
}
