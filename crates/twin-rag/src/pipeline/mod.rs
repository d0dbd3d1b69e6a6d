//! Question-answering pipeline: retrieval, then generation

pub mod backend;
pub mod orchestrator;
pub mod retrieval;
pub mod state;

pub use backend::{DirectLlmBackend, PipelineBackend};
pub use orchestrator::{Stage, TwinPipeline};
pub use retrieval::{RetrievalOutcome, Retriever};
pub use state::PipelineState;
