//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the chat handler
//! - Wire up middleware (request ID, tracing, CORS, timeout, body limit)
//! - Bind server to listener
//! - Graceful shutdown

use axum::{middleware, routing::post, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::handler::handle_chat;
use crate::http::middleware::cors;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::Shutdown;
use crate::rpc::ChatClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn ChatClient>,
    pub shutdown: Shutdown,
    pub stream_idle_timeout: Option<Duration>,
}

/// HTTP server for the chat gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    shutdown: Shutdown,
}

impl GatewayServer {
    /// Create a new HTTP server with the given configuration and agent client.
    pub fn new(config: GatewayConfig, agent: Arc<dyn ChatClient>, shutdown: Shutdown) -> Self {
        let state = AppState {
            agent,
            shutdown: shutdown.clone(),
            stream_idle_timeout: config.agent.stream_idle_timeout(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            shutdown,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/chat", post(handle_chat))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(cors))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown coordinator fires.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            agent = %self.config.agent.endpoint_uri(),
            "HTTP server starting"
        );

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
