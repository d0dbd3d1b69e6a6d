//! Local answer backends for the fallback chain

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{AnswerBackend, LlmProvider};
use crate::types::Audience;

use super::TwinPipeline;

/// Retrieval-augmented pipeline as a chain backend
///
/// An apology from the generation step counts as a failure so the chain
/// can try the next backend.
pub struct PipelineBackend {
    pipeline: Arc<TwinPipeline>,
}

impl PipelineBackend {
    pub fn new(pipeline: Arc<TwinPipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl AnswerBackend for PipelineBackend {
    async fn answer(&self, question: &str, audience: Audience) -> Result<String> {
        let state = self.pipeline.run(question, audience).await;
        if !state.is_answered() {
            let error = state.error().unwrap_or("generation failed");
            return Err(Error::llm(error.to_string()));
        }
        Ok(state.into_response().final_answer)
    }

    fn name(&self) -> &str {
        "pipeline"
    }
}

/// One completion with the audience persona and no retrieval
pub struct DirectLlmBackend {
    llm: Arc<dyn LlmProvider>,
}

impl DirectLlmBackend {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AnswerBackend for DirectLlmBackend {
    async fn answer(&self, question: &str, audience: Audience) -> Result<String> {
        let prompt = PromptBuilder::build_direct_prompt(question);
        let answer = self.llm.complete(audience.persona(), &prompt).await?;
        if answer.trim().is_empty() {
            return Err(Error::llm("model returned an empty answer"));
        }
        Ok(answer)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
