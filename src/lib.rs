pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod web;

use crate::application::import_terms::{ImportSummary, ImportTermsUseCase, ProgressFn};
use crate::application::search_terms::SearchTermsUseCase;
use crate::application::stats::StatsUseCase;
use crate::domain::entities::term_record::{TermMatch, TermRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::term_collection::{CollectionStats, TermCollection};
use crate::infrastructure::config::Config;
use crate::infrastructure::embeddings::noop::NoopProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::milvus::http_collection::MilvusHttpCollection;
use crate::infrastructure::sqlite::term_collection::SqliteTermCollection;
use std::sync::Arc;

pub struct FinTerm {
    config: Config,
    collection: Arc<dyn TermCollection>,
    embedder: Arc<dyn EmbeddingProvider>,
    import_uc: ImportTermsUseCase,
    search_uc: SearchTermsUseCase,
    stats_uc: StatsUseCase,
}

impl FinTerm {
    /// Wire adapters from configuration: embedding provider by name,
    /// collection backend by the embedded/networked toggle.
    pub fn from_config(config: Config) -> Result<Self, DomainError> {
        let embedder: Arc<dyn EmbeddingProvider> = match config.provider.as_str() {
            "openai" => Arc::new(OpenAiProvider::new(
                config.api_key.clone().unwrap_or_default(),
                Some(config.model.clone()),
                None,
            )),
            _ => Arc::new(NoopProvider),
        };

        let collection: Arc<dyn TermCollection> = if config.use_embedded {
            Arc::new(SqliteTermCollection::open(&config.db_path, &config.collection)?)
        } else {
            Arc::new(MilvusHttpCollection::new(
                &config.db_host,
                config.db_port,
                &config.collection,
            ))
        };

        Ok(Self::with_providers(config, collection, embedder))
    }

    pub fn with_providers(
        config: Config,
        collection: Arc<dyn TermCollection>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            import_uc: ImportTermsUseCase::new(
                collection.clone(),
                embedder.clone(),
                config.collection.clone(),
                config.embed_batch_size,
                config.insert_batch_size,
                config.dimension,
                config.model.clone(),
            ),
            search_uc: SearchTermsUseCase::new(collection.clone(), embedder.clone()),
            stats_uc: StatsUseCase::new(collection.clone()),
            collection,
            embedder,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Warn when the stored vectors were built with a different dimension
    /// than the current provider produces. A reload fixes the drift.
    pub async fn warn_on_dimension_drift(&self) {
        let provider_dim = self.embedder.dimension();
        if provider_dim == 0 {
            return;
        }
        if let Ok(Some(stored)) = self.collection.stored_dimension().await {
            if stored != provider_dim {
                tracing::warn!(
                    stored,
                    provider = provider_dim,
                    "Stored vectors have a different dimension than the embedding \
                     provider produces. Run `finterm load` to rebuild the collection."
                );
            }
        }
    }

    // Delegating methods
    pub async fn import(
        &self,
        records: Vec<TermRecord>,
        on_embed_progress: Option<&ProgressFn>,
        on_insert_progress: Option<&ProgressFn>,
    ) -> Result<ImportSummary, DomainError> {
        self.import_uc
            .execute(records, on_embed_progress, on_insert_progress)
            .await
    }

    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<TermMatch>, DomainError> {
        self.search_uc.execute(query, top_k).await
    }

    pub async fn stats(&self) -> Result<CollectionStats, DomainError> {
        self.stats_uc.execute().await
    }
}
