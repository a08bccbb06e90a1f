//! JSON request shapes accepted on `POST /api/chat`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One conversation turn.
///
/// `role` is not checked against a fixed set; "user", "assistant" and
/// "system" are conventional but anything decodes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ChatMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Inbound chat request, messages in conversation order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "nullable_messages")]
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Decode a request body.
    ///
    /// Only the first JSON value is read; anything after it is ignored.
    /// `null` stands for an empty value at every level, missing fields
    /// default to empty and unknown fields are ignored. An empty body is
    /// an error.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::Deserializer::from_slice(body)
            .into_iter::<Option<ChatRequest>>()
            .next()
        {
            Some(decoded) => Ok(decoded?.unwrap_or_default()),
            None => Err(serde_json::Error::custom("EOF")),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_messages<'de, D>(deserializer: D) -> Result<Vec<ChatMessage>, D::Error>
where
    D: Deserializer<'de>,
{
    let messages: Option<Vec<Option<ChatMessage>>> = Option::deserialize(deserializer)?;
    Ok(messages
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
