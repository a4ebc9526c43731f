//! Full-load pipeline: embed the term list in fixed-size chunks, recreate
//! the target collection, insert in independently sized batches, then
//! finalize (index + load). Any failure aborts the run.

use crate::domain::entities::term_record::TermRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::ports::term_collection::TermCollection;
use crate::domain::values::batch_size::BatchSize;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Progress callback: (items done, items total).
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Flush cadence during insertion, in batches.
const FLUSH_EVERY_BATCHES: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub total_terms: usize,
    pub collection_name: String,
    pub embedding_model: String,
    pub embedding_dim: usize,
}

pub struct ImportTermsUseCase {
    collection: Arc<dyn TermCollection>,
    embedder: Arc<dyn EmbeddingProvider>,
    collection_name: String,
    embed_batch_size: BatchSize,
    insert_batch_size: BatchSize,
    dimension: usize,
    model: String,
}

impl ImportTermsUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        collection: Arc<dyn TermCollection>,
        embedder: Arc<dyn EmbeddingProvider>,
        collection_name: String,
        embed_batch_size: BatchSize,
        insert_batch_size: BatchSize,
        dimension: usize,
        model: String,
    ) -> Self {
        Self {
            collection,
            embedder,
            collection_name,
            embed_batch_size,
            insert_batch_size,
            dimension,
            model,
        }
    }

    pub async fn execute(
        &self,
        records: Vec<TermRecord>,
        on_embed_progress: Option<&ProgressFn>,
        on_insert_progress: Option<&ProgressFn>,
    ) -> Result<ImportSummary, DomainError> {
        let vectors = self.embed_all(&records, on_embed_progress).await?;

        self.collection.recreate(self.dimension).await?;
        self.insert_all(&records, &vectors, on_insert_progress).await?;
        self.collection.finalize().await?;

        tracing::info!(
            total = records.len(),
            collection = %self.collection_name,
            "Import complete"
        );
        Ok(ImportSummary {
            total_terms: records.len(),
            collection_name: self.collection_name.clone(),
            embedding_model: self.model.clone(),
            embedding_dim: self.dimension,
        })
    }

    async fn embed_all(
        &self,
        records: &[TermRecord],
        on_progress: Option<&ProgressFn>,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        let texts: Vec<String> = records.iter().map(|r| r.term.clone()).collect();
        let total = texts.len();
        let batch = self.embed_batch_size.get();
        let total_batches = total.div_ceil(batch);

        tracing::info!(total, batch, total_batches, "Generating embeddings");
        let start = Instant::now();
        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(total);

        for chunk in texts.chunks(batch) {
            let batch_start = Instant::now();
            let batch_vectors = self.embedder.embed(chunk, InputType::Document).await?;
            if batch_vectors.len() != chunk.len() {
                return Err(DomainError::Embedding(format!(
                    "Provider returned {} vectors for {} inputs",
                    batch_vectors.len(),
                    chunk.len()
                )));
            }
            for vector in &batch_vectors {
                if vector.len() != self.dimension {
                    return Err(DomainError::Embedding(format!(
                        "Embedding dimension mismatch: provider returned {}, collection expects {}",
                        vector.len(),
                        self.dimension
                    )));
                }
            }
            vectors.extend(batch_vectors);

            let processed = vectors.len();
            let elapsed = start.elapsed().as_secs_f64();
            let remaining_secs = if processed > 0 {
                elapsed / processed as f64 * (total - processed) as f64
            } else {
                0.0
            };
            tracing::info!(
                processed,
                total,
                batch_secs = batch_start.elapsed().as_secs_f64(),
                eta_secs = remaining_secs,
                "Embedded batch"
            );
            if let Some(progress) = on_progress {
                progress(processed, total);
            }
        }

        tracing::info!(
            total,
            total_secs = start.elapsed().as_secs_f64(),
            "Embedding generation complete"
        );
        Ok(vectors)
    }

    async fn insert_all(
        &self,
        records: &[TermRecord],
        vectors: &[Vec<f32>],
        on_progress: Option<&ProgressFn>,
    ) -> Result<(), DomainError> {
        let total = records.len();
        let batch = self.insert_batch_size.get();
        let total_batches = total.div_ceil(batch);
        tracing::info!(total, batch, total_batches, "Inserting records");

        let mut inserted = 0usize;
        for (batch_idx, (record_chunk, vector_chunk)) in records
            .chunks(batch)
            .zip(vectors.chunks(batch))
            .enumerate()
        {
            inserted += self.collection.insert_batch(record_chunk, vector_chunk).await?;
            tracing::info!(
                batch = batch_idx + 1,
                total_batches,
                inserted,
                total,
                "Inserted batch"
            );
            if let Some(progress) = on_progress {
                progress(inserted, total);
            }
            if (batch_idx + 1) % FLUSH_EVERY_BATCHES == 0 {
                self.collection.flush().await?;
            }
        }
        self.collection.flush().await?;
        Ok(())
    }
}
