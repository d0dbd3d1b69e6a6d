//! Persistent vector collection backed by SQLite
//!
//! Every named collection lives in `<dir>/collections.sqlite3`. Embeddings are
//! stored as little-endian `f32` blobs and searched by brute-force cosine
//! similarity, which is plenty for a few thousand project documents.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::vector_store::VectorSearchResult;
use crate::types::Document;

/// Database file name inside the storage directory
pub const DATABASE_FILE: &str = "collections.sqlite3";

/// A named, append-only set of embedded documents
#[derive(Debug)]
pub struct VectorCollection {
    conn: Arc<Mutex<Connection>>,
    name: String,
    dimensions: usize,
}

impl VectorCollection {
    /// Open (or create) the collection `name` under `dir`
    ///
    /// The first open records `model` and `dimensions`. Reopening with a
    /// different model fails, since its vectors would not be comparable.
    pub fn open(dir: &Path, name: &str, model: &str, dimensions: usize) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let conn = Connection::open(dir.join(DATABASE_FILE))
            .map_err(|e| Error::vector_db(format!("Failed to open collection database: {}", e)))?;

        Self::from_connection(conn, name, model, dimensions)
    }

    /// Create an in-memory collection (for testing)
    #[cfg(test)]
    pub fn in_memory(name: &str, model: &str, dimensions: usize) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::vector_db(format!("Failed to open in-memory database: {}", e)))?;

        Self::from_connection(conn, name, model, dimensions)
    }

    fn from_connection(conn: Connection, name: &str, model: &str, dimensions: usize) -> Result<Self> {
        migrate(&conn)?;
        let dimensions = get_or_create(&conn, name, model, dimensions)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            name: name.to_string(),
            dimensions,
        })
    }

    /// Append documents in one transaction, returning how many were written
    pub fn add(&self, documents: &[Document]) -> Result<usize> {
        if let Some(doc) = documents.iter().find(|d| d.embedding.len() != self.dimensions) {
            return Err(Error::vector_db(format!(
                "Embedding has {} dimensions, collection '{}' expects {}",
                doc.embedding.len(),
                self.name,
                self.dimensions
            )));
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (collection, content, embedding, ingested_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for doc in documents {
                stmt.execute(params![
                    self.name,
                    doc.content,
                    encode_embedding(&doc.embedding),
                    doc.ingested_at,
                ])?;
            }
        }
        tx.commit()?;

        tracing::debug!("Added {} documents to collection '{}'", documents.len(), self.name);
        Ok(documents.len())
    }

    /// Up to `top_k` documents by descending cosine similarity
    ///
    /// Ties keep insertion order.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>> {
        if query.len() != self.dimensions {
            return Err(Error::vector_db(format!(
                "Query has {} dimensions, collection '{}' expects {}",
                query.len(),
                self.name,
                self.dimensions
            )));
        }
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, content, embedding, ingested_at FROM documents
             WHERE collection = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![self.name], |row| {
            let blob: Vec<u8> = row.get(2)?;
            Ok(Document {
                id: Some(row.get(0)?),
                content: row.get(1)?,
                embedding: decode_embedding(&blob),
                ingested_at: row.get(3)?,
            })
        })?;

        let mut scored = Vec::new();
        for row in rows {
            let document = row?;
            let similarity = cosine_similarity(query, &document.embedding);
            scored.push(VectorSearchResult {
                document,
                similarity,
            });
        }

        // sort_by is stable, so equal scores stay in id order
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    /// Number of documents in the collection
    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![self.name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Whether the collection holds no documents
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;
        "#,
    )
    .map_err(|e| Error::vector_db(format!("Failed to set pragmas: {}", e)))?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS collections (
            name TEXT PRIMARY KEY,
            model TEXT NOT NULL,
            dimensions INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL REFERENCES collections(name),
            content TEXT NOT NULL,
            embedding BLOB NOT NULL,
            ingested_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
        "#,
    )
    .map_err(|e| Error::vector_db(format!("Failed to run migrations: {}", e)))?;

    Ok(())
}

/// Returns the dimensionality recorded for the collection
fn get_or_create(conn: &Connection, name: &str, model: &str, dimensions: usize) -> Result<usize> {
    let existing: Option<(String, i64)> = conn
        .query_row(
            "SELECT model, dimensions FROM collections WHERE name = ?1",
            params![name],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match existing {
        Some((recorded, _)) if recorded != model => Err(Error::vector_db(format!(
            "Collection '{}' was indexed with model '{}', not '{}'",
            name, recorded, model
        ))),
        Some((_, recorded_dims)) => Ok(recorded_dims as usize),
        None => {
            conn.execute(
                "INSERT INTO collections (name, model, dimensions, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, model, dimensions as i64, chrono::Utc::now()],
            )?;
            tracing::info!(
                "Created collection '{}' (model: {}, dimensions: {})",
                name,
                model,
                dimensions
            );
            Ok(dimensions)
        }
    }
}

fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Cosine similarity; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
