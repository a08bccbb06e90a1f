//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): chat requests by response status
//! - `gateway_request_duration_seconds` (histogram): time until the response
//!   (or the error) was returned, excluding the streamed body
//! - `gateway_streams_total` (counter): finished streams by outcome
//!   (`done`, `failed`, `cancelled`)
//! - `gateway_chunks_relayed_total` (counter): SSE frames flushed to clients
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

use crate::bridge::{BridgeOutcome, BridgeState};

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a chat request once its status is known.
pub fn record_request(status: u16, started: Instant) {
    counter!("gateway_requests_total", "status" => status.to_string()).increment(1);
    histogram!("gateway_request_duration_seconds").record(started.elapsed().as_secs_f64());
}

/// Record a finished stream.
pub fn record_stream(outcome: &BridgeOutcome) {
    counter!("gateway_streams_total", "outcome" => outcome_label(outcome.state())).increment(1);
    counter!("gateway_chunks_relayed_total").increment(outcome.frames);
}

fn outcome_label(state: BridgeState) -> &'static str {
    match state {
        BridgeState::Done => "done",
        BridgeState::Failed => "failed",
        BridgeState::Cancelled => "cancelled",
    }
}
