//! Chat gateway
//!
//! Accepts chat conversations over HTTP and streams the agent's reply back
//! as Server-Sent Events.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────┐
//!                       │                  CHAT GATEWAY                 │
//!   POST /api/chat      │  ┌────────┐   ┌───────────┐   ┌────────────┐  │
//!   ────────────────────┼─▶│  http  │──▶│   chat    │──▶│    rpc     │──┼──▶ Agent
//!                       │  │handler │   │ translate │   │ AgentClient│  │   (gRPC)
//!                       │  └────────┘   └───────────┘   └─────┬──────┘  │
//!                       │                                     │ chunks  │
//!   text/event-stream   │  ┌────────┐   ┌───────────┐         │         │
//!   ◀───────────────────┼──│response│◀──│  bridge   │◀────────┘         │
//!                       │  │  body  │   │ pump loop │                   │
//!                       │  └────────┘   └───────────┘                   │
//!                       │                                               │
//!                       │  config · lifecycle · observability           │
//!                       └───────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use chat_gateway::config::{resolve_config, ObservabilityConfig, Overrides};
use chat_gateway::lifecycle::{self, signals, Shutdown};
use chat_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "chat-gateway")]
#[command(about = "HTTP/SSE gateway in front of the chat agent", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen port.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Agent gRPC address.
    #[arg(short, long, env = "AGENT_ADDR")]
    agent_addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = Overrides {
        port: cli.port,
        agent_address: cli.agent_addr,
    };

    let config = match resolve_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default())?;
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "chat-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        agent = %config.agent.endpoint_uri(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        trigger.trigger();
    });

    if let Err(e) = lifecycle::run(config, shutdown).await {
        tracing::error!(error = %e, "Fatal error");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
