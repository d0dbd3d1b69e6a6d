//! Response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Audience;

/// Response from the local pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer; never empty
    pub final_answer: String,
    /// Diagnostic recorded by a degraded stage
    pub error: Option<String>,
}

/// A backend that was tried and failed before the answering one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendFailure {
    pub backend: String,
    pub error: String,
}

/// Response from the backend chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub audience: Audience,
    /// Name of the backend that produced the answer
    pub backend: String,
    /// Backends tried earlier in the chain
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<BackendFailure>,
}

/// Ingestion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    Success,
}

/// Response from the ingestion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: IngestStatus,
    pub message: String,
}

impl IngestResponse {
    /// Successful ingestion of `count` documents
    pub fn ingested(count: usize) -> Self {
        Self {
            status: IngestStatus::Success,
            message: format!("Successfully ingested {} documents", count),
        }
    }
}

/// Vector store section of the health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreHealth {
    pub available: bool,
    /// Provider name
    pub name: String,
    /// Stored document count (when readable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<usize>,
    /// Why the store is unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    pub message: String,
    pub vector_store: StoreHealth,
    /// Answer backends in chain order
    pub backends: Vec<String>,
    pub timestamp: DateTime<Utc>,
}
