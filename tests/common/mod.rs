//! Shared utilities for gateway integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use futures_util::stream;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::future::{self, Ready};
use std::net::SocketAddr;
use std::task::{Context, Poll};
use tonic::body::BoxBody;
use tonic::codec::ProstCodec;
use tonic::codegen::{http, BoxFuture, Service};
use tonic::server::{Grpc, NamedService, ServerStreamingService};
use tonic::transport::server::TcpIncoming;
use tonic::Status;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chat_gateway::chat::proto::{self, ChatResponseChunk, SERVICE_NAME};
use chat_gateway::config::GatewayConfig;
use chat_gateway::http::GatewayServer;
use chat_gateway::lifecycle::Shutdown;
use chat_gateway::rpc::{BoxChunkSource, ChatClient, ChunkSource, RpcError, RpcResult};

/// One scripted agent response step.
#[derive(Debug, Clone)]
pub enum Step {
    Chunk(&'static str),
    Fail(&'static str),
    /// Emit the chunk forever, pausing between repeats.
    Repeat(&'static str, Duration),
}

/// Replays a script, then signals end of stream.
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    dropped: Arc<AtomicBool>,
}

#[async_trait]
impl ChunkSource for ScriptedSource {
    async fn recv(&mut self) -> RpcResult<Option<ChatResponseChunk>> {
        match self.steps.front().cloned() {
            None => Ok(None),
            Some(Step::Chunk(text)) => {
                self.steps.pop_front();
                Ok(Some(ChatResponseChunk::new(text)))
            }
            Some(Step::Fail(message)) => {
                self.steps.pop_front();
                Err(RpcError::Status(tonic::Status::internal(message)))
            }
            Some(Step::Repeat(text, pause)) => {
                tokio::time::sleep(pause).await;
                Ok(Some(ChatResponseChunk::new(text)))
            }
        }
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

/// Agent double: records requests and replays the same script per call.
pub struct ScriptedClient {
    script: Vec<Step>,
    refuse: bool,
    open_delay: Duration,
    pub requests: Mutex<Vec<proto::ChatRequest>>,
    pub stream_dropped: Arc<AtomicBool>,
}

impl ScriptedClient {
    pub fn new(script: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script,
            refuse: false,
            open_delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
            stream_dropped: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn refusing() -> Arc<Self> {
        Arc::new(Self {
            script: Vec::new(),
            refuse: true,
            open_delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
            stream_dropped: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Like `new`, but each call takes `open_delay` before the stream is open.
    pub fn slow(script: Vec<Step>, open_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script,
            refuse: false,
            open_delay,
            requests: Mutex::new(Vec::new()),
            stream_dropped: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn stream_chat(&self, request: proto::ChatRequest) -> RpcResult<BoxChunkSource> {
        self.requests.lock().unwrap().push(request);
        tokio::time::sleep(self.open_delay).await;
        if self.refuse {
            return Err(RpcError::Status(tonic::Status::unavailable("connection refused")));
        }
        Ok(Box::new(ScriptedSource {
            steps: self.script.clone().into(),
            dropped: self.stream_dropped.clone(),
        }))
    }
}

/// Start a gateway on an ephemeral port.
pub async fn start_gateway(agent: Arc<dyn ChatClient>) -> (SocketAddr, Shutdown) {
    start_gateway_with(GatewayConfig::default(), agent).await
}

pub async fn start_gateway_with(config: GatewayConfig, agent: Arc<dyn ChatClient>) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config, agent, shutdown.clone());

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    (addr, shutdown)
}

pub fn chat_url(addr: SocketAddr) -> String {
    format!("http://{}/api/chat", addr)
}

/// One reply item of the mock agent: a chunk, or the status that ends the stream.
pub type Reply = Result<&'static str, &'static str>;

/// gRPC agent served by tonic, replaying `replies` on every `StreamChat` call.
#[derive(Clone)]
pub struct MockAgent {
    replies: Arc<Vec<Reply>>,
    pub requests: Arc<Mutex<Vec<proto::ChatRequest>>>,
}

struct StreamChat(MockAgent);

type ReplyStream = stream::Iter<std::vec::IntoIter<Result<ChatResponseChunk, Status>>>;

impl ServerStreamingService<proto::ChatRequest> for StreamChat {
    type Response = ChatResponseChunk;
    type ResponseStream = ReplyStream;
    type Future = Ready<Result<tonic::Response<ReplyStream>, Status>>;

    fn call(&mut self, request: tonic::Request<proto::ChatRequest>) -> Self::Future {
        self.0.requests.lock().unwrap().push(request.into_inner());
        let items: Vec<_> = self
            .0
            .replies
            .iter()
            .map(|reply| match reply {
                Ok(text) => Ok(ChatResponseChunk::new(*text)),
                Err(message) => Err(Status::internal(*message)),
            })
            .collect();
        future::ready(Ok(tonic::Response::new(stream::iter(items))))
    }
}

impl Service<http::Request<BoxBody>> for MockAgent {
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<BoxBody>) -> Self::Future {
        // The server only routes `/chat.ChatService/*` here; StreamChat is the only method.
        let method = StreamChat(self.clone());
        Box::pin(async move {
            let codec: ProstCodec<ChatResponseChunk, proto::ChatRequest> = ProstCodec::default();
            let mut grpc = Grpc::new(codec);
            Ok(grpc.server_streaming(method, request).await)
        })
    }
}

impl NamedService for MockAgent {
    const NAME: &'static str = SERVICE_NAME;
}

/// Serve a mock agent on an ephemeral port until `shutdown` fires.
pub async fn start_mock_agent(replies: Vec<Reply>, shutdown: &Shutdown) -> (SocketAddr, MockAgent) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let incoming = TcpIncoming::from_listener(listener, true, None).unwrap();
    let agent = MockAgent {
        replies: Arc::new(replies),
        requests: Arc::default(),
    };

    let service = agent.clone();
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = tonic::transport::Server::builder()
            .add_service(service)
            .serve_with_incoming_shutdown(incoming, async move { shutdown.wait().await })
            .await;
    });

    (addr, agent)
}
