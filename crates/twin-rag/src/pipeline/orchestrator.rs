//! Two-stage pipeline orchestrator

use std::sync::Arc;

use crate::generation::AnswerGenerator;
use crate::providers::LlmProvider;
use crate::retrieval::DocumentStore;
use crate::types::Audience;

use super::retrieval::Retriever;
use super::state::PipelineState;

/// Pipeline stages, visited in order exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Retrieval,
    Generation,
    End,
}

impl Stage {
    /// The following stage; `None` after `End`
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::Retrieval),
            Stage::Retrieval => Some(Stage::Generation),
            Stage::Generation => Some(Stage::End),
            Stage::End => None,
        }
    }
}

/// Retrieval then generation, no branching or retries
pub struct TwinPipeline {
    retriever: Retriever,
    generator: AnswerGenerator,
}

impl TwinPipeline {
    pub fn new(retriever: Retriever, generator: AnswerGenerator) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    /// Build from the shared store and completion provider
    pub fn from_parts(store: Arc<DocumentStore>, llm: Arc<dyn LlmProvider>, top_k: usize) -> Self {
        Self::new(Retriever::new(store, top_k), AnswerGenerator::new(llm))
    }

    /// Run one question to completion; the final answer is never empty
    pub async fn run(&self, question: &str, audience: Audience) -> PipelineState {
        let mut state = PipelineState::new(question, audience);
        let mut stage = Stage::Start;

        while let Some(next) = stage.next() {
            tracing::debug!("Pipeline stage: {:?} -> {:?}", stage, next);

            match next {
                Stage::Retrieval => {
                    let outcome = self.retriever.retrieve(state.question()).await;
                    state.apply_retrieval(outcome);
                }
                Stage::Generation => {
                    let context = state.context_docs().unwrap_or_default();
                    let outcome = self
                        .generator
                        .generate(state.question(), state.audience(), context)
                        .await;
                    state.apply_generation(outcome);
                }
                Stage::Start | Stage::End => {}
            }

            stage = next;
        }

        tracing::info!(
            "Answered question ({} context docs, audience: {}, degraded: {})",
            state.context_docs().map_or(0, <[String]>::len),
            audience,
            state.error().is_some()
        );

        state
    }
}
