use crate::domain::entities::term_record::TermMatch;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::ports::term_collection::TermCollection;
use std::sync::Arc;

pub struct SearchTermsUseCase {
    collection: Arc<dyn TermCollection>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SearchTermsUseCase {
    pub fn new(collection: Arc<dyn TermCollection>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { collection, embedder }
    }

    pub async fn execute(&self, query: &str, top_k: usize) -> Result<Vec<TermMatch>, DomainError> {
        let vectors = self
            .embedder
            .embed(&[query.to_string()], InputType::Query)
            .await?;
        match vectors.first() {
            Some(vector) if !vector.is_empty() => self.collection.search(vector, top_k).await,
            _ => Ok(vec![]),
        }
    }
}
