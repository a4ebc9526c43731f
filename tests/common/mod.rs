//! Shared test helpers.

use finterm::domain::entities::term_record::{TermMatch, TermRecord};
use finterm::domain::error::DomainError;
use finterm::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use finterm::domain::ports::term_collection::{CollectionStats, TermCollection};
use finterm::infrastructure::config::Config;
use finterm::infrastructure::sqlite::term_collection::SqliteTermCollection;
use finterm::FinTerm;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Deterministic offline embedder: the vector depends only on the text, so
/// identical texts embed identically and cosine search is exercisable
/// without a network.
pub struct StubProvider {
    pub dimension: usize,
    /// Chunk sizes seen by `embed`, for batching assertions.
    pub calls: Mutex<Vec<usize>>,
}

impl StubProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let bytes = text.as_bytes();
        (0..self.dimension)
            .map(|i| {
                let byte = if bytes.is_empty() {
                    0
                } else {
                    bytes[i % bytes.len()] as u32
                };
                let mixed = byte.wrapping_mul(31).wrapping_add(i as u32 * 7) % 101;
                mixed as f32 / 101.0 + 0.01
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for StubProvider {
    async fn embed(
        &self,
        texts: &[String],
        _input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        self.calls.lock().unwrap().push(texts.len());
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Collection double that records lifecycle calls instead of storing rows.
#[derive(Default)]
pub struct RecordingCollection {
    pub recreated_with: Mutex<Option<usize>>,
    pub insert_batches: Mutex<Vec<usize>>,
    pub flushes: Mutex<usize>,
    pub finalized: Mutex<bool>,
}

#[async_trait::async_trait]
impl TermCollection for RecordingCollection {
    async fn recreate(&self, dimension: usize) -> Result<(), DomainError> {
        *self.recreated_with.lock().unwrap() = Some(dimension);
        Ok(())
    }

    async fn insert_batch(
        &self,
        records: &[TermRecord],
        vectors: &[Vec<f32>],
    ) -> Result<usize, DomainError> {
        assert_eq!(records.len(), vectors.len());
        self.insert_batches.lock().unwrap().push(records.len());
        Ok(records.len())
    }

    async fn search(&self, _vector: &[f32], _limit: usize) -> Result<Vec<TermMatch>, DomainError> {
        Ok(vec![])
    }

    async fn flush(&self) -> Result<(), DomainError> {
        *self.flushes.lock().unwrap() += 1;
        Ok(())
    }

    async fn finalize(&self) -> Result<(), DomainError> {
        *self.finalized.lock().unwrap() = true;
        Ok(())
    }

    async fn stats(&self) -> Result<CollectionStats, DomainError> {
        Ok(CollectionStats {
            collection_name: "recording".to_string(),
            total_terms: self.insert_batches.lock().unwrap().iter().sum(),
            dimension: *self.recreated_with.lock().unwrap(),
            last_import_at: None,
        })
    }

    async fn stored_dimension(&self) -> Result<Option<usize>, DomainError> {
        Ok(*self.recreated_with.lock().unwrap())
    }
}

/// Config resolved from an explicit map, no process environment involved.
pub fn test_config(dimension: usize, embed_batch: usize, insert_batch: usize) -> Config {
    let env: HashMap<String, String> = [
        ("FINTERM_EMBEDDING_PROVIDER", "noop".to_string()),
        ("FINTERM_EMBEDDING_DIM", dimension.to_string()),
        ("FINTERM_EMBED_BATCH_SIZE", embed_batch.to_string()),
        ("FINTERM_INSERT_BATCH_SIZE", insert_batch.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    Config::from_sources(None, &env).unwrap()
}

/// Facade over an in-memory collection and the stub embedder.
pub fn setup(dimension: usize) -> FinTerm {
    setup_with_batches(dimension, 500, 1000)
}

pub fn setup_with_batches(dimension: usize, embed_batch: usize, insert_batch: usize) -> FinTerm {
    let config = test_config(dimension, embed_batch, insert_batch);
    let collection = SqliteTermCollection::open(":memory:", &config.collection).unwrap();
    FinTerm::with_providers(
        config,
        Arc::new(collection),
        Arc::new(StubProvider::new(dimension)),
    )
}

pub fn records(pairs: &[(&str, &str)]) -> Vec<TermRecord> {
    pairs
        .iter()
        .map(|(term, category)| TermRecord::new(term.to_string(), category.to_string()).unwrap())
        .collect()
}
