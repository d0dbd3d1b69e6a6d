//! Documents stored in the vector collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A text chunk in the vector collection
///
/// Carries no caller metadata. Identity is the insertion order assigned by
/// the collection; there is no deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Row id assigned on insert (`None` until stored)
    pub id: Option<i64>,
    /// Raw text
    pub content: String,
    /// Embedding vector (not serialized)
    #[serde(skip)]
    pub embedding: Vec<f32>,
    /// Insertion timestamp
    pub ingested_at: DateTime<Utc>,
}

impl Document {
    /// Wrap a raw text with its embedding
    pub fn new(content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: None,
            content: content.into(),
            embedding,
            ingested_at: Utc::now(),
        }
    }
}
