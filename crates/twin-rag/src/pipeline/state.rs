//! Per-request pipeline state

use crate::generation::GenerationOutcome;
use crate::types::response::QueryResponse;
use crate::types::Audience;

use super::retrieval::RetrievalOutcome;

/// Record threaded through one pipeline run
///
/// Stages never mutate it directly. Each returns an outcome, and the
/// matching `apply_*` method writes only the fields that stage owns.
#[derive(Debug, Clone)]
pub struct PipelineState {
    question: String,
    audience: Audience,
    context_docs: Option<Vec<String>>,
    final_answer: String,
    error: Option<String>,
    answered: bool,
}

impl PipelineState {
    pub fn new(question: impl Into<String>, audience: Audience) -> Self {
        Self {
            question: question.into(),
            audience,
            context_docs: None,
            final_answer: String::new(),
            error: None,
            answered: false,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn audience(&self) -> Audience {
        self.audience
    }

    /// `None` until retrieval has run
    pub fn context_docs(&self) -> Option<&[String]> {
        self.context_docs.as_deref()
    }

    /// Empty until generation has run
    pub fn final_answer(&self) -> &str {
        &self.final_answer
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the model produced the answer (as opposed to an apology)
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn apply_retrieval(&mut self, outcome: RetrievalOutcome) {
        match outcome {
            RetrievalOutcome::Retrieved(docs) => self.context_docs = Some(docs),
            RetrievalOutcome::Degraded { reason } => {
                self.context_docs = Some(Vec::new());
                self.error = Some(reason);
            }
        }
    }

    /// A generation error replaces any retrieval diagnostic
    pub fn apply_generation(&mut self, outcome: GenerationOutcome) {
        match outcome {
            GenerationOutcome::Answered(answer) => {
                self.final_answer = answer;
                self.answered = true;
            }
            GenerationOutcome::Apologized { answer, error } => {
                self.final_answer = answer;
                self.error = Some(error);
                self.answered = false;
            }
        }
    }

    pub fn into_response(self) -> QueryResponse {
        QueryResponse {
            final_answer: self.final_answer,
            error: self.error,
        }
    }
}
