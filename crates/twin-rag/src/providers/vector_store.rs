//! Vector store provider trait for storing and searching embeddings

use async_trait::async_trait;
use crate::error::Result;
use crate::types::Document;

/// Search result from vector store
#[derive(Debug, Clone)]
pub struct VectorSearchResult {
    /// The matched document
    pub document: Document,
    /// Cosine similarity (-1.0 to 1.0, higher is more similar)
    pub similarity: f32,
}

/// Trait for vector storage and similarity search
///
/// Append-only: there is no update or delete.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Append embedded documents, returning how many were written
    async fn add_documents(&self, documents: &[Document]) -> Result<usize>;

    /// Up to `top_k` nearest documents, most similar first
    async fn search(&self, query_embedding: &[f32], top_k: usize)
        -> Result<Vec<VectorSearchResult>>;

    /// Get total number of documents stored
    async fn count(&self) -> Result<usize>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
