//! Test doubles shared by unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, LlmProvider};

/// Completion provider with a fixed reply that records every call
pub struct StaticLlm {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
}

impl StaticLlm {
    pub fn ok(reply: &str) -> Self {
        Self::with_reply(Ok(reply.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_reply(Err(message.to_string()))
    }

    fn with_reply(reply: std::result::Result<String, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (system, prompt) pairs in call order
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for StaticLlm {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push((system.to_string(), prompt.to_string()));
        self.reply.clone().map_err(Error::llm)
    }

    fn name(&self) -> &str {
        "static"
    }

    fn model(&self) -> &str {
        "static-1"
    }
}

/// Embedder whose every call fails
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::embedding("embedding service down"))
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn model(&self) -> &str {
        "failing"
    }

    fn name(&self) -> &str {
        "failing"
    }
}
