//! Configuration for the digital twin service
//!
//! Built once at startup: defaults, then an optional TOML file, then `.env`
//! and the process environment. Components receive the sections they need
//! by reference and never read the environment themselves.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::Audience;

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwinConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Completion endpoint configuration
    pub llm: LlmConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Vector collection configuration
    pub vector_db: VectorDbConfig,
    /// Retrieval step configuration
    pub retrieval: RetrievalConfig,
    /// Hosted assistant (LangGraph deployment) configuration
    pub assistant: AssistantConfig,
    /// Answer backends, tried in order by `/api/ask`
    pub backends: Vec<BackendKind>,
}

impl Default for TwinConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            embeddings: EmbeddingConfig::default(),
            vector_db: VectorDbConfig::default(),
            retrieval: RetrievalConfig::default(),
            assistant: AssistantConfig::default(),
            // Hosted assistant first, local pipeline second
            backends: vec![BackendKind::Hosted, BackendKind::Pipeline],
        }
    }
}

impl TwinConfig {
    /// Load configuration: defaults, optional TOML file, `.env`, environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        // A missing .env file is fine
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse TOML; absent sections and fields keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Invalid config file: {}", e)))
    }

    /// Overlay values from an environment lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("TWIN_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("TWIN_PORT") {
            self.server.port = parse_var("TWIN_PORT", &port)?;
        }
        if let Some(origins) = get("ALLOWED_ORIGINS") {
            self.server.allowed_origins = split_list(&origins);
        }
        if let Some(token) = get("INGEST_AUTH_TOKEN") {
            self.server.ingest_token = Some(token);
        }

        if let Some(url) = get("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.llm.generate_model = model;
        }
        if let Some(temperature) = get("LLM_TEMPERATURE") {
            self.llm.temperature = parse_var("LLM_TEMPERATURE", &temperature)?;
        }
        if let Some(timeout) = get("LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_var("LLM_TIMEOUT_SECS", &timeout)?;
        }

        if let Some(provider) = get("EMBEDDING_PROVIDER") {
            self.embeddings.provider = parse_var("EMBEDDING_PROVIDER", &provider)?;
        }
        if let Some(model) = get("EMBEDDING_MODEL") {
            self.embeddings.model = model;
        }
        if let Some(dimensions) = get("EMBEDDING_DIMENSIONS") {
            self.embeddings.dimensions = parse_var("EMBEDDING_DIMENSIONS", &dimensions)?;
        }

        if let Some(dir) = get("VECTOR_STORE_DIR") {
            self.vector_db.storage_dir = PathBuf::from(dir);
        }
        if let Some(name) = get("VECTOR_COLLECTION") {
            self.vector_db.collection = name;
        }
        if let Some(top_k) = get("RETRIEVAL_TOP_K") {
            self.retrieval.top_k = parse_var("RETRIEVAL_TOP_K", &top_k)?;
        }

        if let Some(url) = get("DR_BASE_URL") {
            self.assistant.base_url = Some(url.trim_end_matches('/').to_string());
        }
        if let Some(key) = get("DR_API_KEY") {
            self.assistant.api_key = Some(key);
        }
        if let Some(required) = get("DR_REQUIRED") {
            self.assistant.required = parse_var("DR_REQUIRED", &required)?;
        }
        if let Some(id) = get("ASSISTANT_ID_PUBLIC") {
            self.assistant.assistants.public = id;
        }
        if let Some(id) = get("ASSISTANT_ID_INVESTOR") {
            self.assistant.assistants.investor = id;
        }
        if let Some(id) = get("ASSISTANT_ID_BOARDROOM") {
            self.assistant.assistants.boardroom = id;
        }

        if let Some(backends) = get("TWIN_BACKENDS") {
            self.backends = split_list(&backends)
                .iter()
                .map(|b| parse_var("TWIN_BACKENDS", b))
                .collect::<Result<Vec<_>>>()?;
        }

        Ok(())
    }

    /// Check cross-field constraints; fails startup, not requests
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(Error::config("retrieval.top_k must be at least 1"));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::config("embeddings.dimensions must be at least 1"));
        }
        if self.backends.is_empty() {
            return Err(Error::config("at least one answer backend must be configured"));
        }
        if self.assistant.required && !self.assistant.is_configured() {
            return Err(Error::config(
                "DR_BASE_URL and DR_API_KEY must be configured when DR_REQUIRED is set",
            ));
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::config(format!("Invalid value for {}: {} ({})", key, value, e)))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Allowed CORS origins; no CORS layer when empty
    pub allowed_origins: Vec<String>,
    /// Shared secret for the ingestion endpoint
    #[serde(skip_serializing)]
    pub ingest_token: Option<String>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8003,
            allowed_origins: Vec::new(),
            ingest_token: None,
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// LLM (OpenAI-compatible) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// API key, required at first use
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Completion model name
    pub generate_model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            generate_model: "gpt-4".to_string(),
            temperature: 0.1, // Low randomness for factual answers
            timeout_secs: 30,
        }
    }
}

/// Which embedding function indexes the collection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// OpenAI `/embeddings` endpoint
    #[default]
    OpenAi,
    /// Offline feature hashing
    Hash,
}

impl FromStr for EmbeddingProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "hash" => Ok(Self::Hash),
            other => Err(format!("unknown embedding provider '{}'", other)),
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider
    pub provider: EmbeddingProviderKind,
    /// Embedding model name (recorded on the collection)
    pub model: String,
    /// Embedding dimensions
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::OpenAi,
            model: "text-embedding-ada-002".to_string(),
            dimensions: 1536,
        }
    }
}

/// Vector collection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// Directory holding the collection database
    pub storage_dir: PathBuf,
    /// Collection name
    pub collection: String,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("vector_store"),
            collection: "ghc_documents".to_string(),
        }
    }
}

/// Retrieval step configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of documents fetched per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Hosted assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Deployment base URL
    pub base_url: Option<String>,
    /// Deployment API key (`x-api-key`)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Fail startup when the deployment is not configured
    pub required: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Assistant identity per audience
    pub assistants: AudienceAssistants,
}

impl AssistantConfig {
    /// Whether both the URL and the key are present
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            required: false,
            timeout_secs: 30,
            assistants: AudienceAssistants::default(),
        }
    }
}

/// Hosted assistant id for each audience
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudienceAssistants {
    pub public: String,
    pub investor: String,
    pub boardroom: String,
}

impl AudienceAssistants {
    /// Assistant id serving an audience
    pub fn for_audience(&self, audience: Audience) -> &str {
        match audience {
            Audience::Public => &self.public,
            Audience::Investor => &self.investor,
            Audience::Boardroom => &self.boardroom,
        }
    }
}

impl Default for AudienceAssistants {
    fn default() -> Self {
        Self {
            public: "34747e20-39db-415e-bd80-597006f71a7a".to_string(),
            investor: "ff7afd85-51e0-4fdd-8ec5-a14508a100f9".to_string(),
            boardroom: "76f94782-5f1d-4ea0-8e69-294da3e1aefb".to_string(),
        }
    }
}

/// Answer backend selection for the fallback chain
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted LangGraph assistant
    Hosted,
    /// Local retrieval + generation pipeline
    Pipeline,
    /// Direct completion without retrieval
    OpenAi,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hosted" => Ok(Self::Hosted),
            "pipeline" => Ok(Self::Pipeline),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}
