//! Vector store adapter
//!
//! Hides whether the collection opened. Initialization never fails; an
//! unavailable store answers searches with no documents and refuses writes.

use std::sync::Arc;

use crate::config::VectorDbConfig;
use crate::error::{Error, Result};
use crate::providers::local::LocalVectorStore;
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::response::StoreHealth;
use crate::types::Document;

use super::VectorCollection;

enum StoreState {
    Available(Arc<dyn VectorStoreProvider>),
    Unavailable(String),
}

/// The pipeline's handle on the document collection
pub struct DocumentStore {
    state: StoreState,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl DocumentStore {
    /// Open the configured collection, degrading to unavailable on failure
    pub fn initialize(config: &VectorDbConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let opened = VectorCollection::open(
            &config.storage_dir,
            &config.collection,
            embedder.model(),
            embedder.dimensions(),
        );

        match opened {
            Ok(collection) => {
                tracing::info!(
                    "Vector store ready: collection '{}' in {}",
                    config.collection,
                    config.storage_dir.display()
                );
                let store = LocalVectorStore::new(Arc::new(collection));
                Self::with_provider(Arc::new(store), embedder)
            }
            Err(e) => {
                tracing::warn!("Vector store unavailable: {}", e);
                Self::unavailable(e.to_string(), embedder)
            }
        }
    }

    /// Wrap an already-open provider
    pub fn with_provider(
        store: Arc<dyn VectorStoreProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            state: StoreState::Available(store),
            embedder,
        }
    }

    /// A store that could not be opened
    pub fn unavailable(reason: impl Into<String>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            state: StoreState::Unavailable(reason.into()),
            embedder,
        }
    }

    /// Whether the collection opened
    pub fn is_available(&self) -> bool {
        matches!(self.state, StoreState::Available(_))
    }

    /// Why the collection did not open
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            StoreState::Available(_) => None,
            StoreState::Unavailable(reason) => Some(reason),
        }
    }

    fn store(&self) -> Result<&Arc<dyn VectorStoreProvider>> {
        match &self.state {
            StoreState::Available(store) => Ok(store),
            StoreState::Unavailable(reason) => Err(Error::StoreUnavailable(reason.clone())),
        }
    }

    /// Embed and append raw texts, returning how many were stored
    pub async fn add_documents(&self, texts: &[String]) -> Result<usize> {
        let store = self.store()?;
        if texts.is_empty() {
            return Ok(0);
        }

        let embeddings = self.embedder.embed_batch(texts).await?;
        if embeddings.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Embedder returned {} vectors for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        let documents: Vec<Document> = texts
            .iter()
            .zip(embeddings)
            .map(|(text, embedding)| Document::new(text.clone(), embedding))
            .collect();

        let count = store.add_documents(&documents).await?;
        tracing::info!("Stored {} documents via {}", count, store.name());
        Ok(count)
    }

    /// Up to `k` stored texts, most similar first
    ///
    /// An unavailable store yields no documents rather than an error.
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<String>> {
        let StoreState::Available(store) = &self.state else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.embedder.embed(query).await?;
        let results = store.search(&embedding, k).await?;

        tracing::debug!("Similarity search returned {} documents", results.len());
        Ok(results.into_iter().map(|r| r.document.content).collect())
    }

    /// Number of stored documents
    pub async fn document_count(&self) -> Result<usize> {
        self.store()?.count().await
    }

    /// Provider name, or "unavailable"
    pub fn name(&self) -> &str {
        match &self.state {
            StoreState::Available(store) => store.name(),
            StoreState::Unavailable(_) => "unavailable",
        }
    }

    /// Health section for the health endpoint
    pub async fn health(&self) -> StoreHealth {
        match &self.state {
            StoreState::Available(store) => match store.count().await {
                Ok(count) => StoreHealth {
                    available: true,
                    name: store.name().to_string(),
                    documents: Some(count),
                    reason: None,
                },
                Err(e) => StoreHealth {
                    available: false,
                    name: store.name().to_string(),
                    documents: None,
                    reason: Some(e.to_string()),
                },
            },
            StoreState::Unavailable(reason) => StoreHealth {
                available: false,
                name: self.name().to_string(),
                documents: None,
                reason: Some(reason.clone()),
            },
        }
    }
}
