//! OpenAI-compatible providers for embeddings and completions
//!
//! One HTTP client serves both `/embeddings` and `/chat/completions`. Calls
//! are bounded by the configured timeout and never retried; a missing API
//! key fails the call that needs it, not startup.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// OpenAI API client
pub struct OpenAiClient {
    /// HTTP client
    client: Client,
    /// Completion configuration
    config: LlmConfig,
    /// Embedding model name
    embed_model: String,
    /// Embedding dimensions
    dimensions: usize,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(llm: &LlmConfig, embeddings: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(llm.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            config: llm.clone(),
            embed_model: embeddings.model.clone(),
            dimensions: embeddings.dimensions,
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::config("OPENAI_API_KEY is not configured"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Embed a batch of texts in one request, preserving input order
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let key = self.api_key()?;
        let request = EmbedRequest {
            model: &self.embed_model,
            input: texts,
        };

        let response = self
            .client
            .post(self.url("embeddings"))
            .bearer_auth(key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Embedding failed: HTTP {} - {}",
                status, body
            )));
        }

        let mut embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        if embed_response.data.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embed_response.data.len()
            )));
        }

        embed_response.data.sort_by_key(|d| d.index);
        Ok(embed_response.data.into_iter().map(|d| d.embedding).collect())
    }

    /// One chat completion
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let key = self.api_key()?;
        let request = ChatRequest {
            model: &self.config.generate_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
        };

        tracing::debug!("Requesting completion from model: {}", self.config.generate_model);

        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "Completion failed: HTTP {} - {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse completion response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::llm("Completion returned no content"))
    }
}

/// OpenAI embedding provider
pub struct OpenAiEmbedder {
    client: Arc<OpenAiClient>,
}

impl OpenAiEmbedder {
    /// Create from existing client
    pub fn from_client(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client
            .embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("Empty response from OpenAI"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.client.embed_batch(texts).await
    }

    fn dimensions(&self) -> usize {
        self.client.dimensions
    }

    fn model(&self) -> &str {
        &self.client.embed_model
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// OpenAI completion provider
pub struct OpenAiLlm {
    client: Arc<OpenAiClient>,
}

impl OpenAiLlm {
    /// Create from existing client
    pub fn from_client(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmProvider for OpenAiLlm {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        self.client.complete(system, prompt).await
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.client.config.generate_model
    }
}

/// Combined provider sharing a single client for embeddings and completions
pub struct OpenAiProvider {
    embedder: OpenAiEmbedder,
    llm: OpenAiLlm,
}

impl OpenAiProvider {
    /// Create a new combined provider
    pub fn new(llm: &LlmConfig, embeddings: &EmbeddingConfig) -> Result<Self> {
        let client = Arc::new(OpenAiClient::new(llm, embeddings)?);
        Ok(Self {
            embedder: OpenAiEmbedder::from_client(Arc::clone(&client)),
            llm: OpenAiLlm::from_client(client),
        })
    }

    /// Split into separate providers
    pub fn split(self) -> (OpenAiEmbedder, OpenAiLlm) {
        (self.embedder, self.llm)
    }
}
