//! Retrieval step

use std::sync::Arc;

use crate::retrieval::DocumentStore;

/// Result of the retrieval step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalOutcome {
    /// Search ran; may be empty
    Retrieved(Vec<String>),
    /// Search could not run; continue with no context
    Degraded { reason: String },
}

/// Fetches the context documents for a question
pub struct Retriever {
    store: Arc<DocumentStore>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: Arc<DocumentStore>, top_k: usize) -> Self {
        Self { store, top_k }
    }

    /// Never fails; problems are reported as `Degraded`
    pub async fn retrieve(&self, question: &str) -> RetrievalOutcome {
        if !self.store.is_available() {
            tracing::warn!("Retrieval skipped: vector store not available");
            return RetrievalOutcome::Degraded {
                reason: "Vector store not available".to_string(),
            };
        }

        match self.store.similarity_search(question, self.top_k).await {
            Ok(docs) => {
                tracing::debug!("Retrieved {} context documents", docs.len());
                RetrievalOutcome::Retrieved(docs)
            }
            Err(e) => {
                tracing::warn!("Search error: {}", e);
                RetrievalOutcome::Degraded {
                    reason: format!("Search error: {}", e),
                }
            }
        }
    }
}
