//! Configuration resolution.
//!
//! Settings are resolved in precedence order: explicit CLI parameter >
//! process environment > first config file found among [`CONFIG_CANDIDATES`]
//! > built-in default. The embedding API key is the only required setting,
//! and only when the provider is `openai`.

use crate::domain::error::DomainError;
use crate::domain::values::batch_size::BatchSize;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Candidate config files, checked in order; the first that exists wins.
pub const CONFIG_CANDIDATES: &[&str] = &["finterm.toml", ".finterm.toml"];

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Embedding provider: "openai" or "noop".
    pub provider: String,
    pub api_key: Option<String>,
    pub model: String,
    pub dimension: usize,
    pub embed_batch_size: BatchSize,
    pub insert_batch_size: BatchSize,
    /// Cap on CSV rows for test runs; 0 = unlimited.
    pub row_limit: usize,
    /// true = single-file embedded database, false = networked server.
    pub use_embedded: bool,
    pub db_path: String,
    pub db_host: String,
    pub db_port: u16,
    pub collection: String,
    pub http_host: String,
    pub http_port: u16,
}

/// On-disk config file shape. Every field is optional; missing fields fall
/// through to environment and defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub embedding: EmbeddingSection,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub import: ImportSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddingSection {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub dimension: Option<usize>,
    pub batch_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSection {
    pub embedded: Option<bool>,
    pub path: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub collection: Option<String>,
    pub insert_batch_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportSection {
    pub row_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Resolve configuration from the process environment and the first
    /// candidate config file that exists in the working directory.
    pub fn load() -> Result<Self, DomainError> {
        let file = Self::find_config_file(Path::new("."))?;
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_sources(file, &env)
    }

    /// Load the first candidate config file under `dir`, if any.
    pub fn find_config_file(dir: &Path) -> Result<Option<FileConfig>, DomainError> {
        for candidate in CONFIG_CANDIDATES {
            let path = dir.join(candidate);
            if !path.exists() {
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .map_err(|e| DomainError::Config(format!("Failed to read {}: {e}", path.display())))?;
            let parsed: FileConfig = toml::from_str(&content)
                .map_err(|e| DomainError::Config(format!("Failed to parse {}: {e}", path.display())))?;
            tracing::debug!(path = %path.display(), "Loaded config file");
            return Ok(Some(parsed));
        }
        Ok(None)
    }

    /// Resolve from explicit sources. Environment values take precedence
    /// over file values; defaults fill the rest. Kept separate from
    /// [`Config::load`] so tests can pass their own environment.
    pub fn from_sources(
        file: Option<FileConfig>,
        env: &HashMap<String, String>,
    ) -> Result<Self, DomainError> {
        let file = file.unwrap_or_default();

        let provider = env_string(env, "FINTERM_EMBEDDING_PROVIDER")
            .or(file.embedding.provider)
            .unwrap_or_else(|| "openai".to_string());
        let api_key = env_string(env, "FINTERM_EMBEDDING_API_KEY").or(file.embedding.api_key);
        let model = env_string(env, "FINTERM_EMBEDDING_MODEL")
            .or(file.embedding.model)
            .unwrap_or_else(|| "text-embedding-3-large".to_string());
        let dimension = env_usize(env, "FINTERM_EMBEDDING_DIM")?
            .or(file.embedding.dimension)
            .unwrap_or(3072);

        let embed_batch = env_usize(env, "FINTERM_EMBED_BATCH_SIZE")?
            .or(file.embedding.batch_size)
            .unwrap_or(500);
        let insert_batch = env_usize(env, "FINTERM_INSERT_BATCH_SIZE")?
            .or(file.database.insert_batch_size)
            .unwrap_or(1000);

        let row_limit = env_usize(env, "FINTERM_ROW_LIMIT")?
            .or(file.import.row_limit)
            .unwrap_or(0);

        let use_embedded = env_bool(env, "FINTERM_USE_EMBEDDED")
            .or(file.database.embedded)
            .unwrap_or(true);
        let db_path = env_string(env, "FINTERM_DB_PATH")
            .or(file.database.path)
            .unwrap_or_else(|| "db/terms.db".to_string());
        let db_host = env_string(env, "FINTERM_DB_HOST")
            .or(file.database.host)
            .unwrap_or_else(|| "localhost".to_string());
        // An unparseable port falls back to the default rather than failing.
        let db_port = env_port(env, "FINTERM_DB_PORT")
            .or(file.database.port)
            .unwrap_or(19530);
        let collection = env_string(env, "FINTERM_COLLECTION")
            .or(file.database.collection)
            .unwrap_or_else(|| "finance_terms".to_string());

        let http_host = env_string(env, "FINTERM_HTTP_HOST")
            .or(file.server.host)
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let http_port = env_port(env, "FINTERM_HTTP_PORT")
            .or(file.server.port)
            .unwrap_or(7860);

        let config = Config {
            provider,
            api_key,
            model,
            dimension,
            embed_batch_size: BatchSize::new(embed_batch).map_err(DomainError::Config)?,
            insert_batch_size: BatchSize::new(insert_batch).map_err(DomainError::Config)?,
            row_limit,
            use_embedded,
            db_path,
            db_host,
            db_port,
            collection,
            http_host,
            http_port,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.provider == "openai" && self.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(DomainError::Config(
                "Embedding API key not set. Provide FINTERM_EMBEDDING_API_KEY or \
                 embedding.api_key in finterm.toml"
                    .to_string(),
            ));
        }
        if self.dimension == 0 {
            return Err(DomainError::Config(
                "Embedding dimension must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_string(env: &HashMap<String, String>, key: &str) -> Option<String> {
    env.get(key).map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Numeric env value. Empty string counts as unset; a non-empty value that
/// does not parse is a hard error.
fn env_usize(env: &HashMap<String, String>, key: &str) -> Result<Option<usize>, DomainError> {
    match env_string(env, key) {
        None => Ok(None),
        Some(s) => s
            .parse::<usize>()
            .map(Some)
            .map_err(|_| DomainError::Parse(format!("{key} must be an integer, got '{s}'"))),
    }
}

/// Port env value. Invalid values are ignored so a bad port falls back to
/// the default instead of aborting.
fn env_port(env: &HashMap<String, String>, key: &str) -> Option<u16> {
    env_string(env, key).and_then(|s| s.parse::<u16>().ok())
}

fn env_bool(env: &HashMap<String, String>, key: &str) -> Option<bool> {
    env_string(env, key).map(|s| s.to_lowercase() == "true")
}
