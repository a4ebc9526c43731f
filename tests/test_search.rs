mod common;

use common::{records, setup};
use finterm::infrastructure::embeddings::noop::NoopProvider;
use finterm::infrastructure::sqlite::term_collection::SqliteTermCollection;
use finterm::FinTerm;
use std::sync::Arc;

async fn loaded() -> FinTerm {
    let ft = setup(16);
    ft.import(
        records(&[
            ("call option", "derivatives"),
            ("put option", "derivatives"),
            ("bond yield", "fixed income"),
            ("dividend payout ratio", "equities"),
            ("repo rate", "rates"),
        ]),
        None,
        None,
    )
    .await
    .unwrap();
    ft
}

#[tokio::test]
async fn test_exact_term_ranks_first() {
    let ft = loaded().await;
    let matches = ft.search("call option", 5).await.unwrap();
    assert_eq!(matches[0].term, "call option");
    assert_eq!(matches[0].category, "derivatives");
    assert!(matches[0].score > 0.999);
}

#[tokio::test]
async fn test_scores_are_descending() {
    let ft = loaded().await;
    let matches = ft.search("bond yield", 5).await.unwrap();
    for pair in matches.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn test_top_k_truncates() {
    let ft = loaded().await;
    let matches = ft.search("repo rate", 2).await.unwrap();
    assert_eq!(matches.len(), 2);
}

#[tokio::test]
async fn test_top_k_beyond_count_returns_all() {
    let ft = loaded().await;
    let matches = ft.search("dividend", 50).await.unwrap();
    assert_eq!(matches.len(), 5);
}

#[tokio::test]
async fn test_empty_collection_returns_empty() {
    let ft = setup(16);
    ft.import(vec![], None, None).await.unwrap();
    let matches = ft.search("anything", 5).await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_noop_provider_yields_no_matches() {
    let config = common::test_config(16, 500, 1000);
    let collection =
        Arc::new(SqliteTermCollection::open(":memory:", &config.collection).unwrap());
    let ft = FinTerm::with_providers(config, collection, Arc::new(NoopProvider));
    let matches = ft.search("call option", 5).await.unwrap();
    assert!(matches.is_empty());
}
