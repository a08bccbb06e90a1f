//! External → internal request translation.

use crate::chat::model::ChatRequest;
use crate::chat::proto;

/// Map a decoded JSON request onto the agent wire request.
///
/// Message `i` of the output is message `i` of the input with role and
/// content copied verbatim. Cannot fail and has no side effects.
pub fn translate(external: &ChatRequest) -> proto::ChatRequest {
    proto::ChatRequest {
        messages: external
            .messages
            .iter()
            .map(|m| proto::Message {
                role: m.role.clone(),
                content: m.content.clone(),
            })
            .collect(),
    }
}
