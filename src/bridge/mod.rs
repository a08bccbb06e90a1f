//! Streaming bridge: one HTTP request to one agent stream.
//!
//! # States
//! - Opening: translated request in hand, no agent stream yet
//! - Streaming: relaying chunks, one frame and one flush per non-empty chunk
//! - Done: agent signalled end of stream
//! - Failed: opening failed, or the stream errored after the response was committed
//! - Cancelled: client disconnected or the gateway is shutting down
//!
//! # State Transitions
//! ```text
//! Opening → Failed:     stream_chat error            (StreamingBridge::open)
//! Opening → Failed:     sink cannot flush            (StreamingBridge::attach)
//! Opening → Streaming:  stream open, sink attached   (BridgePump::run)
//! Streaming → Done:     Ok(None) from the source
//! Streaming → Failed:   Err from the source
//! Streaming → Cancelled: sink closed / shutdown
//! ```
//!
//! # Design Decisions
//! - At most one chunk in flight: recv(n + 1) starts only after flush(n) returns
//! - Mid-stream failures emit nothing; the client only sees the body end
//! - The source is dropped on every exit path, which cancels the agent call

pub mod frame;
pub mod sink;

use std::future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

use crate::chat::proto::{self, ChatResponseChunk};
use crate::rpc::{BoxChunkSource, ChatClient, ChunkSource, RpcError, RpcResult};

pub use frame::encode_event;
pub use sink::{EventSink, SinkClosed};

/// Failures that end an exchange before any response is committed.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The agent stream could not be opened.
    #[error("Failed to call agent: {0}")]
    BackendUnavailable(#[source] RpcError),

    /// The response transport cannot flush incrementally.
    #[error("Streaming not supported")]
    StreamingUnsupported,
}

/// Terminal bridge states.
///
/// Opening and Streaming are not values: they are `StreamingBridge` and
/// `BridgePump` respectively, so only a finished run reports a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Done,
    Failed,
    Cancelled,
}

/// Why a stream was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    ClientGone,
    Shutdown,
}

/// How the streaming phase ended.
#[derive(Debug)]
pub enum Termination {
    Completed,
    Failed(RpcError),
    Cancelled(CancelReason),
}

/// Terminal report of one pump run.
#[derive(Debug)]
pub struct BridgeOutcome {
    pub termination: Termination,
    /// Frames written and flushed.
    pub frames: u64,
    /// Empty chunks received and dropped.
    pub empty_chunks: u64,
}

impl BridgeOutcome {
    pub fn state(&self) -> BridgeState {
        match self.termination {
            Termination::Completed => BridgeState::Done,
            Termination::Failed(_) => BridgeState::Failed,
            Termination::Cancelled(_) => BridgeState::Cancelled,
        }
    }
}

/// A bridge whose agent stream is open but not yet attached to a response.
pub struct StreamingBridge {
    source: BoxChunkSource,
    idle_timeout: Option<Duration>,
}

impl StreamingBridge {
    /// Open the agent stream for `request`.
    pub async fn open<C>(client: &C, request: proto::ChatRequest) -> Result<Self, BridgeError>
    where
        C: ChatClient + ?Sized,
    {
        let source = client
            .stream_chat(request)
            .await
            .map_err(BridgeError::BackendUnavailable)?;
        Ok(Self::from_source(source))
    }

    /// Start from an already-open stream.
    pub fn from_source(source: BoxChunkSource) -> Self {
        Self {
            source,
            idle_timeout: None,
        }
    }

    /// Fail the stream if no chunk arrives within `timeout`.
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Bind the response sink. Nothing is written yet.
    pub fn attach<K: EventSink>(self, sink: K) -> Result<BridgePump<K>, BridgeError> {
        if !sink.supports_flush() {
            return Err(BridgeError::StreamingUnsupported);
        }
        Ok(BridgePump {
            source: self.source,
            sink,
            idle_timeout: self.idle_timeout,
            shutdown: None,
        })
    }
}

/// A bridge ready to stream.
pub struct BridgePump<K> {
    source: BoxChunkSource,
    sink: K,
    idle_timeout: Option<Duration>,
    shutdown: Option<watch::Receiver<bool>>,
}

enum Step {
    Received(RpcResult<Option<ChatResponseChunk>>),
    Cancelled(CancelReason),
}

impl<K: EventSink> BridgePump<K> {
    /// Stop streaming when the gateway shuts down.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Relay chunks until the stream ends, fails, or is cancelled.
    pub async fn run(self) -> BridgeOutcome {
        let BridgePump {
            mut source,
            mut sink,
            idle_timeout,
            mut shutdown,
        } = self;
        let mut frames = 0u64;
        let mut empty_chunks = 0u64;

        let termination = loop {
            let step = tokio::select! {
                biased;
                _ = sink.closed() => Step::Cancelled(CancelReason::ClientGone),
                _ = shutdown_requested(&mut shutdown) => Step::Cancelled(CancelReason::Shutdown),
                next = recv_next(source.as_mut(), idle_timeout) => Step::Received(next),
            };

            match step {
                Step::Cancelled(reason) => break Termination::Cancelled(reason),
                Step::Received(Ok(None)) => break Termination::Completed,
                Step::Received(Err(e)) => break Termination::Failed(e),
                Step::Received(Ok(Some(chunk))) => {
                    let Some(frame) = encode_event(&chunk.chunk) else {
                        empty_chunks += 1;
                        continue;
                    };
                    if sink.write_frame(frame).await.is_err() || sink.flush().await.is_err() {
                        break Termination::Cancelled(CancelReason::ClientGone);
                    }
                    frames += 1;
                }
            }
        };

        drop(source);
        BridgeOutcome {
            termination,
            frames,
            empty_chunks,
        }
    }
}

async fn recv_next(
    source: &mut dyn ChunkSource,
    idle_timeout: Option<Duration>,
) -> RpcResult<Option<ChatResponseChunk>> {
    match idle_timeout {
        Some(limit) => tokio::time::timeout(limit, source.recv())
            .await
            .map_err(|_| RpcError::IdleTimeout(limit.as_secs()))?,
        None => source.recv().await,
    }
}

async fn shutdown_requested(shutdown: &mut Option<watch::Receiver<bool>>) {
    let Some(rx) = shutdown else {
        return future::pending().await;
    };
    // Checks the current value first, so a trigger that predates the
    // subscription still counts.
    if rx.wait_for(|triggered| *triggered).await.is_err() {
        // Coordinator gone without firing: never resolves.
        future::pending::<()>().await;
    }
}
