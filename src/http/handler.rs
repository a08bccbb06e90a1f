//! `POST /api/chat`.
//!
//! Decode → translate → open agent stream → attach SSE body → spawn pump.
//! Everything that can fail with a status code happens before the response
//! is returned; after that the pump owns the exchange.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use std::time::Instant;
use tracing::Instrument;

use crate::bridge::{BridgeOutcome, CancelReason, StreamingBridge, Termination};
use crate::chat::{translate, ChatRequest};
use crate::http::error::GatewayError;
use crate::http::request::RequestIdExt;
use crate::http::response::{sse_channel, sse_response};
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn handle_chat(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let started = Instant::now();
    let request_id = headers.request_id().unwrap_or("unknown").to_string();
    let span = tracing::info_span!("chat", request_id = %request_id);

    let response = match start_stream(&state, &body).instrument(span.clone()).await {
        Ok(response) => response,
        Err(e) => {
            span.in_scope(|| tracing::warn!(status = %e.status(), error = %e, "Chat request rejected"));
            e.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), started);
    response
}

async fn start_stream(state: &AppState, body: &[u8]) -> Result<Response, GatewayError> {
    let external = ChatRequest::from_json(body).map_err(|e| GatewayError::MalformedInput(e.to_string()))?;
    let request = translate(&external);

    tracing::debug!(messages = request.messages.len(), "Opening agent stream");
    let bridge = StreamingBridge::open(state.agent.as_ref(), request)
        .await?
        .with_idle_timeout(state.stream_idle_timeout);

    let (sink, body) = sse_channel();
    let pump = bridge.attach(sink)?.with_shutdown(state.shutdown.subscribe());

    tokio::spawn(
        async move {
            let outcome = pump.run().await;
            report(&outcome);
        }
        .in_current_span(),
    );

    Ok(sse_response(body))
}

fn report(outcome: &BridgeOutcome) {
    match &outcome.termination {
        Termination::Completed => tracing::info!(
            frames = outcome.frames,
            empty_chunks = outcome.empty_chunks,
            "Agent stream completed"
        ),
        Termination::Failed(e) => tracing::warn!(
            error = %e,
            frames = outcome.frames,
            "Agent stream failed mid-response, closing without error frame"
        ),
        Termination::Cancelled(CancelReason::ClientGone) => tracing::debug!(
            frames = outcome.frames,
            "Client disconnected, agent stream abandoned"
        ),
        Termination::Cancelled(CancelReason::Shutdown) => tracing::info!(
            frames = outcome.frames,
            "Agent stream ended by shutdown"
        ),
    }
    metrics::record_stream(outcome);
}
