use crate::domain::entities::term_record::{TermMatch, TermRecord};
use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Statistics reported by a collection backend.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    pub collection_name: String,
    pub total_terms: usize,
    pub dimension: Option<usize>,
    pub last_import_at: Option<DateTime<Utc>>,
}

/// A named vector collection of terminology records.
///
/// Async because the networked backend is an HTTP client; the embedded
/// SQLite backend completes the same calls synchronously.
#[async_trait::async_trait]
pub trait TermCollection: Send + Sync {
    /// Drop the collection if it exists and recreate it with the schema
    /// (auto-id integer key, term varchar, category varchar, float vector
    /// of `dimension`, cosine metric).
    async fn recreate(&self, dimension: usize) -> Result<(), DomainError>;

    /// Insert one batch of records with their vectors. Records and vectors
    /// are index-aligned. Returns the number of rows inserted.
    async fn insert_batch(
        &self,
        records: &[TermRecord],
        vectors: &[Vec<f32>],
    ) -> Result<usize, DomainError>;

    /// Top-k nearest neighbours by cosine similarity, best first.
    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<TermMatch>, DomainError>;

    /// Persist buffered rows. No-op for backends that write through.
    async fn flush(&self) -> Result<(), DomainError>;

    /// Build the vector index and make the collection queryable.
    async fn finalize(&self) -> Result<(), DomainError>;

    async fn stats(&self) -> Result<CollectionStats, DomainError>;

    /// Dimension recorded at the last `recreate`, if any.
    async fn stored_dimension(&self) -> Result<Option<usize>, DomainError>;
}
