//! Config-file discovery and precedence across sources.

use finterm::infrastructure::config::{Config, FileConfig};
use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_first_candidate_file_wins() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("finterm.toml"),
        "[database]\ncollection = \"primary\"\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join(".finterm.toml"),
        "[database]\ncollection = \"fallback\"\n",
    )
    .unwrap();

    let file = Config::find_config_file(dir.path()).unwrap().unwrap();
    let config = Config::from_sources(
        Some(file),
        &env(&[("FINTERM_EMBEDDING_PROVIDER", "noop")]),
    )
    .unwrap();
    assert_eq!(config.collection, "primary");
}

#[test]
fn test_hidden_candidate_used_when_primary_missing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".finterm.toml"),
        "[database]\ncollection = \"fallback\"\n",
    )
    .unwrap();

    let file = Config::find_config_file(dir.path()).unwrap().unwrap();
    let config = Config::from_sources(
        Some(file),
        &env(&[("FINTERM_EMBEDDING_PROVIDER", "noop")]),
    )
    .unwrap();
    assert_eq!(config.collection, "fallback");
}

#[test]
fn test_no_candidate_files_yields_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::find_config_file(dir.path()).unwrap().is_none());
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("finterm.toml"), "this is not { toml").unwrap();
    assert!(Config::find_config_file(dir.path()).is_err());
}

#[test]
fn test_env_beats_file_beats_default() {
    let file: FileConfig = toml::from_str(
        r#"
        [embedding]
        provider = "noop"
        dimension = 256
        batch_size = 64

        [database]
        port = 29530
        "#,
    )
    .unwrap();

    let config = Config::from_sources(
        Some(file),
        &env(&[("FINTERM_EMBEDDING_DIM", "512")]),
    )
    .unwrap();

    // env > file
    assert_eq!(config.dimension, 512);
    // file > default
    assert_eq!(config.embed_batch_size.get(), 64);
    assert_eq!(config.db_port, 29530);
    // default when neither source sets it
    assert_eq!(config.insert_batch_size.get(), 1000);
    assert_eq!(config.model, "text-embedding-3-large");
}

#[test]
fn test_api_key_from_file_satisfies_requirement() {
    let file: FileConfig = toml::from_str("[embedding]\napi_key = \"sk-from-file\"\n").unwrap();
    let config = Config::from_sources(Some(file), &HashMap::new()).unwrap();
    assert_eq!(config.api_key.as_deref(), Some("sk-from-file"));
}
