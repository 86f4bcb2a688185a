//! Chat message structures for the reasoning engine

use serde::{Deserialize, Serialize};

/// Role of a message in the transcript
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (the fixed instruction text)
    System,

    /// User message (the question and tool observations)
    User,

    /// Assistant message (the engine's own reasoning)
    Assistant,
}

/// One message in a reasoning-engine transcript.
///
/// ReAct is a plain-text protocol, so content is always a string; tool
/// invocation travels inside the text as `Action:` directives rather than
/// as structured function-call blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(Role::Assistant, content)
    }
}
