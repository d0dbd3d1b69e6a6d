//! Application state for the twin server

use std::sync::Arc;

use crate::config::{BackendKind, EmbeddingProviderKind, TwinConfig};
use crate::error::{Error, Result};
use crate::pipeline::{DirectLlmBackend, PipelineBackend, TwinPipeline};
use crate::providers::{
    hashing::HashEmbedder,
    hosted::HostedAssistant,
    openai::OpenAiProvider,
    AnswerBackend, BackendChain, EmbeddingProvider, LlmProvider,
};
use crate::retrieval::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: TwinConfig,
    /// Vector store adapter
    store: Arc<DocumentStore>,
    /// Local retrieval + generation pipeline
    pipeline: Arc<TwinPipeline>,
    /// Ordered answer backends for `/api/ask`
    chain: BackendChain,
}

impl AppState {
    /// Create new application state
    ///
    /// Fails only on configuration errors. An unopenable vector store
    /// degrades the service instead.
    pub async fn new(config: TwinConfig) -> Result<Self> {
        tracing::info!("Initializing twin application state...");
        config.validate()?;

        let (openai_embedder, llm) = OpenAiProvider::new(&config.llm, &config.embeddings)?.split();
        let llm: Arc<dyn LlmProvider> = Arc::new(llm);

        let embedder: Arc<dyn EmbeddingProvider> = match config.embeddings.provider {
            EmbeddingProviderKind::OpenAi => Arc::new(openai_embedder),
            EmbeddingProviderKind::Hash => {
                Arc::new(HashEmbedder::new(config.embeddings.dimensions))
            }
        };
        tracing::info!(
            "Embeddings: {} ({}, {} dimensions)",
            embedder.name(),
            embedder.model(),
            embedder.dimensions()
        );

        let store = Arc::new(DocumentStore::initialize(&config.vector_db, embedder));
        let pipeline = Arc::new(TwinPipeline::from_parts(
            Arc::clone(&store),
            Arc::clone(&llm),
            config.retrieval.top_k,
        ));

        let chain = build_chain(&config, &pipeline, &llm)?;
        tracing::info!("Answer backends: {}", chain.names().join(" -> "));

        Ok(Self::from_parts(config, store, pipeline, chain))
    }

    /// Assemble state from already-built components
    pub fn from_parts(
        config: TwinConfig,
        store: Arc<DocumentStore>,
        pipeline: Arc<TwinPipeline>,
        chain: BackendChain,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                pipeline,
                chain,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &TwinConfig {
        &self.inner.config
    }

    /// Get vector store adapter
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.inner.store
    }

    /// Get local pipeline
    pub fn pipeline(&self) -> &Arc<TwinPipeline> {
        &self.inner.pipeline
    }

    /// Get backend chain
    pub fn chain(&self) -> &BackendChain {
        &self.inner.chain
    }

    /// Ready once the vector collection is open
    pub fn is_ready(&self) -> bool {
        self.inner.store.is_available()
    }
}

/// Build the answer chain in configured order
fn build_chain(
    config: &TwinConfig,
    pipeline: &Arc<TwinPipeline>,
    llm: &Arc<dyn LlmProvider>,
) -> Result<BackendChain> {
    let mut backends: Vec<Arc<dyn AnswerBackend>> = Vec::with_capacity(config.backends.len());

    for kind in &config.backends {
        match kind {
            BackendKind::Hosted => match HostedAssistant::from_config(&config.assistant)? {
                Some(hosted) => backends.push(Arc::new(hosted)),
                None if config.assistant.required => {
                    return Err(Error::config(
                        "DR_BASE_URL and DR_API_KEY must be configured",
                    ));
                }
                None => {
                    tracing::warn!("Hosted assistant not configured (DR_BASE_URL/DR_API_KEY), skipping");
                }
            },
            BackendKind::Pipeline => {
                backends.push(Arc::new(PipelineBackend::new(Arc::clone(pipeline))));
            }
            BackendKind::OpenAi => {
                backends.push(Arc::new(DirectLlmBackend::new(Arc::clone(llm))));
            }
        }
    }

    BackendChain::new(backends)
}
