//! Reasoning engine trait

use crate::error::Result;
use crate::llm::ChatMessage;
use async_trait::async_trait;

/// The external language-model collaborator driving the ReAct loop.
///
/// Injected into the controller so its transition logic stays
/// deterministic and testable against a stubbed engine.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Submit the full transcript and obtain the engine's next free-text turn
    async fn reason(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Get the model name
    fn model_name(&self) -> &str;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}
