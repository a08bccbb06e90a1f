//! Agent wire types for `chat.ChatService`, mirroring `proto/chat.proto`.
//!
//! Written out by hand so the build needs no `protoc`; field tags must stay in
//! step with the `.proto` file.

/// `chat.Message`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Message {
    #[prost(string, tag = "1")]
    pub role: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub content: ::prost::alloc::string::String,
}

/// `chat.ChatRequest`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChatRequest {
    #[prost(message, repeated, tag = "1")]
    pub messages: ::prost::alloc::vec::Vec<Message>,
}

/// `chat.ChatResponse`: one streamed unit of output text.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChatResponseChunk {
    #[prost(string, tag = "1")]
    pub chunk: ::prost::alloc::string::String,
}

impl ChatResponseChunk {
    pub fn new(chunk: impl Into<String>) -> Self {
        Self { chunk: chunk.into() }
    }

    /// Empty chunks are legal on the wire but carry nothing to display.
    pub fn is_empty(&self) -> bool {
        self.chunk.is_empty()
    }
}

/// Fully-qualified service name.
pub const SERVICE_NAME: &str = "chat.ChatService";

/// gRPC path of the server-streaming `StreamChat` method.
pub const STREAM_CHAT_PATH: &str = "/chat.ChatService/StreamChat";
