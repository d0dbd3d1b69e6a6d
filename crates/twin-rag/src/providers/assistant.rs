//! Answer backends and the ordered fallback chain

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::response::BackendFailure;
use crate::types::Audience;

/// Anything that can answer a question for an audience
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// A non-empty answer, or an error so the chain can move on
    async fn answer(&self, question: &str, audience: Audience) -> Result<String>;

    /// Get backend name for logging and responses
    fn name(&self) -> &str;
}

/// Answer from the first backend that succeeded
#[derive(Debug, Clone)]
pub struct ChainAnswer {
    pub answer: String,
    /// Name of the answering backend
    pub backend: String,
    /// Backends that failed before it, in order
    pub failures: Vec<BackendFailure>,
}

/// Backends tried in order until one answers
pub struct BackendChain {
    backends: Vec<Arc<dyn AnswerBackend>>,
}

impl BackendChain {
    /// Create a chain; an empty chain is a configuration error
    pub fn new(backends: Vec<Arc<dyn AnswerBackend>>) -> Result<Self> {
        if backends.is_empty() {
            return Err(Error::config("answer backend chain is empty"));
        }
        Ok(Self { backends })
    }

    /// Backend names in chain order
    pub fn names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }

    /// Try each backend once, in order
    pub async fn answer(&self, question: &str, audience: Audience) -> Result<ChainAnswer> {
        let mut failures = Vec::new();

        for backend in &self.backends {
            match backend.answer(question, audience).await {
                Ok(answer) if !answer.trim().is_empty() => {
                    if !failures.is_empty() {
                        tracing::info!(
                            "Backend '{}' answered after {} failure(s)",
                            backend.name(),
                            failures.len()
                        );
                    }
                    return Ok(ChainAnswer {
                        answer,
                        backend: backend.name().to_string(),
                        failures,
                    });
                }
                Ok(_) => {
                    tracing::warn!("Backend '{}' returned an empty answer", backend.name());
                    failures.push(BackendFailure {
                        backend: backend.name().to_string(),
                        error: "empty answer".to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Backend '{}' failed: {}", backend.name(), e);
                    failures.push(BackendFailure {
                        backend: backend.name().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let summary = failures
            .iter()
            .map(|f| format!("{}: {}", f.backend, f.error))
            .collect::<Vec<_>>()
            .join("; ");
        Err(Error::upstream(format!("all answer backends failed ({})", summary)))
    }
}
