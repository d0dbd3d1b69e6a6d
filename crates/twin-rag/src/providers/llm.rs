//! LLM provider trait for completions

use async_trait::async_trait;
use crate::error::Result;

/// Trait for single-shot text completion
///
/// Implementations:
/// - `OpenAiLlm`: OpenAI-compatible `/chat/completions`
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete `prompt` under the given system instruction
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
