//! Local vector store provider wrapping the SQLite collection

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::retrieval::VectorCollection;
use crate::types::Document;

use super::vector_store::{VectorSearchResult, VectorStoreProvider};

/// Local vector store over a [`VectorCollection`]
pub struct LocalVectorStore {
    collection: Arc<VectorCollection>,
}

impl LocalVectorStore {
    /// Create from an open collection
    pub fn new(collection: Arc<VectorCollection>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl VectorStoreProvider for LocalVectorStore {
    async fn add_documents(&self, documents: &[Document]) -> Result<usize> {
        // SQLite calls are sync, wrap in blocking task
        let collection = self.collection.clone();
        let documents = documents.to_vec();
        tokio::task::spawn_blocking(move || collection.add(&documents))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorSearchResult>> {
        let collection = self.collection.clone();
        let query = query_embedding.to_vec();
        tokio::task::spawn_blocking(move || collection.search(&query, top_k))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    async fn count(&self) -> Result<usize> {
        let collection = self.collection.clone();
        tokio::task::spawn_blocking(move || collection.len())
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    fn name(&self) -> &str {
        "local-sqlite"
    }
}
