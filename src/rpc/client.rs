//! Agent client with a tonic transport.
//!
//! # Responsibilities
//! - Build the channel to the agent (lazy by default, eager on request)
//! - Issue `chat.ChatService/StreamChat` with the prost codec
//! - Expose the response stream through `ChunkSource`

use async_trait::async_trait;
use std::time::Duration;
use tonic::client::Grpc;
use tonic::codec::{ProstCodec, Streaming};
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};

use crate::chat::proto::{self, ChatResponseChunk, STREAM_CHAT_PATH};
use crate::config::AgentConfig;
use crate::rpc::types::{RpcError, RpcResult};

/// Receiving half of one agent stream.
#[async_trait]
pub trait ChunkSource: Send {
    /// Wait for the next chunk. `Ok(None)` is the end-of-stream signal.
    async fn recv(&mut self) -> RpcResult<Option<ChatResponseChunk>>;
}

/// Boxed stream handle owned by a single bridge.
pub type BoxChunkSource = Box<dyn ChunkSource>;

/// Anything that can open a streaming chat call.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn stream_chat(&self, request: proto::ChatRequest) -> RpcResult<BoxChunkSource>;
}

#[async_trait]
impl ChunkSource for Streaming<ChatResponseChunk> {
    async fn recv(&mut self) -> RpcResult<Option<ChatResponseChunk>> {
        Ok(self.message().await?)
    }
}

/// gRPC client for the conversational agent.
#[derive(Debug, Clone)]
pub struct AgentClient {
    inner: Grpc<Channel>,
}

impl AgentClient {
    /// Wrap an existing channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    /// Build a client from configuration.
    ///
    /// Only an unusable address fails unless `connect_eagerly` is set, in
    /// which case the agent must also accept a connection.
    pub async fn connect(config: &AgentConfig) -> RpcResult<Self> {
        let uri = config.endpoint_uri();
        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| RpcError::InvalidAddress {
                address: config.address.clone(),
                reason: e.to_string(),
            })?
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        let channel = if config.connect_eagerly {
            endpoint
                .connect()
                .await
                .map_err(|source| RpcError::Connect {
                    address: uri.clone(),
                    source,
                })?
        } else {
            endpoint.connect_lazy()
        };

        tracing::info!(
            agent = %uri,
            eager = config.connect_eagerly,
            "Agent client initialized"
        );

        Ok(Self::new(channel))
    }
}

#[async_trait]
impl ChatClient for AgentClient {
    async fn stream_chat(&self, request: proto::ChatRequest) -> RpcResult<BoxChunkSource> {
        let mut grpc = self.inner.clone();
        grpc.ready()
            .await
            .map_err(|e| RpcError::Unavailable(e.to_string()))?;

        let codec: ProstCodec<proto::ChatRequest, ChatResponseChunk> = ProstCodec::default();
        let response = grpc
            .server_streaming(
                tonic::Request::new(request),
                PathAndQuery::from_static(STREAM_CHAT_PATH),
                codec,
            )
            .await?;

        Ok(Box::new(response.into_inner()))
    }
}
