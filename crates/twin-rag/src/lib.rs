//! twin-rag: digital twin Q&A service for Green Hill Canarias
//!
//! Questions are answered by a two-stage pipeline (vector retrieval, then
//! one LLM completion) or by an ordered chain of answer backends that puts a
//! hosted LangGraph assistant in front of the local pipeline. A token-guarded
//! endpoint adds raw texts to the persistent vector collection.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::TwinConfig;
pub use error::{Error, Result};
pub use pipeline::{PipelineState, TwinPipeline};
pub use retrieval::DocumentStore;
pub use types::{
    query::{AskRequest, IngestRequest, QueryRequest},
    response::{AskResponse, IngestResponse, QueryResponse},
    Audience, Document,
};
