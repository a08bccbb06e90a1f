//! SSE response construction.
//!
//! # Responsibilities
//! - Declare the event-stream content type and caching directives
//! - Feed the response body from the bridge, one frame at a time
//!
//! # Design Decisions
//! - The body is a capacity-1 channel: a flush completes once the server
//!   has taken the frame off the channel to write it out
//! - The receiver is dropped with the body, which is how a client
//!   disconnect reaches the bridge

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::Response;
use bytes::Bytes;
use std::convert::Infallible;
use tokio::sync::mpsc;

use crate::bridge::{EventSink, SinkClosed};

/// Channel-backed sink driving a streaming response body.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<Bytes>,
}

/// Create a sink and the response body it feeds.
pub fn sse_channel() -> (ChannelSink, Body) {
    let (tx, rx) = mpsc::channel::<Bytes>(1);
    let frames = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|frame| (Ok::<_, Infallible>(frame), rx))
    });
    (ChannelSink { tx }, Body::from_stream(frames))
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn write_frame(&mut self, frame: Bytes) -> Result<(), SinkClosed> {
        self.tx.send(frame).await.map_err(|_| SinkClosed)
    }

    async fn flush(&mut self) -> Result<(), SinkClosed> {
        // A free slot means the body has taken the last frame.
        self.tx.reserve().await.map(drop).map_err(|_| SinkClosed)
    }

    async fn closed(&self) {
        self.tx.closed().await
    }
}

/// Wrap a body in a 200 event-stream response.
pub fn sse_response(body: Body) -> Response {
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    response
}
