use crate::domain::error::DomainError;
use crate::domain::ports::term_collection::{CollectionStats, TermCollection};
use std::sync::Arc;

pub struct StatsUseCase {
    collection: Arc<dyn TermCollection>,
}

impl StatsUseCase {
    pub fn new(collection: Arc<dyn TermCollection>) -> Self {
        Self { collection }
    }

    pub async fn execute(&self) -> Result<CollectionStats, DomainError> {
        self.collection.stats().await
    }
}
