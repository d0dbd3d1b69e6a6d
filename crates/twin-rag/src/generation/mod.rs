//! Answer generation with the LLM

pub mod answer;
pub mod prompt;

pub use answer::{AnswerGenerator, GenerationOutcome};
pub use prompt::{PromptBuilder, FALLBACK_CONTEXT};
