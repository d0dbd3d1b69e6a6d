//! Ingestion of raw texts into the vector collection
//!
//! Texts are stored as-is: no chunking, no metadata, no deduplication.

use crate::error::{Error, Result};
use crate::retrieval::DocumentStore;
use crate::types::response::IngestResponse;

/// Validate and forward texts to the store
///
/// An empty list is rejected before the store or embedder is touched.
pub async fn ingest_texts(store: &DocumentStore, texts: &[String]) -> Result<IngestResponse> {
    if texts.is_empty() {
        return Err(Error::invalid_request("No texts provided for ingestion"));
    }

    let count = store.add_documents(texts).await?;
    tracing::info!("Ingested {} documents", count);
    Ok(IngestResponse::ingested(count))
}
