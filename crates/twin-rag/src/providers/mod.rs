//! Provider abstractions for embeddings, completions, vector storage and
//! answer backends
//!
//! Trait objects at these seams let the service swap OpenAI for offline
//! embeddings, and the hosted assistant for the local pipeline.

pub mod assistant;
pub mod embedding;
pub mod hashing;
pub mod hosted;
pub mod llm;
pub mod local;
pub mod openai;
pub mod vector_store;

pub use assistant::{AnswerBackend, BackendChain, ChainAnswer};
pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use vector_store::VectorStoreProvider;
