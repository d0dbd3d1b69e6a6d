//! Answer generation step

use std::sync::Arc;

use crate::providers::LlmProvider;
use crate::types::Audience;

use super::prompt::PromptBuilder;

/// Result of the generation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The model produced a non-empty answer
    Answered(String),
    /// The call failed; `answer` is the apology shown to the caller
    Apologized { answer: String, error: String },
}

impl GenerationOutcome {
    /// Apology for a failed completion
    pub fn apology(error: impl Into<String>) -> Self {
        let error = error.into();
        Self::Apologized {
            answer: format!(
                "I apologize, but I encountered an error while processing your question: {}",
                error
            ),
            error,
        }
    }
}

/// Produces the final answer from retrieved context with one completion call
pub struct AnswerGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Generate an answer; failures become an apology, never an error
    pub async fn generate(
        &self,
        question: &str,
        audience: Audience,
        context_docs: &[String],
    ) -> GenerationOutcome {
        let context = PromptBuilder::build_context(context_docs);
        let prompt = PromptBuilder::build_twin_prompt(&context, question);

        tracing::debug!(
            "Generating answer with {} ({} context docs, audience: {})",
            self.llm.model(),
            context_docs.len(),
            audience
        );

        match self.llm.complete(audience.persona(), &prompt).await {
            Ok(text) if !text.trim().is_empty() => GenerationOutcome::Answered(text),
            Ok(_) => {
                tracing::warn!("Model returned an empty answer");
                GenerationOutcome::apology("model returned an empty answer")
            }
            Err(e) => {
                tracing::warn!("Answer generation failed: {}", e);
                GenerationOutcome::apology(e.to_string())
            }
        }
    }
}
