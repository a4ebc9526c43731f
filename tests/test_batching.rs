//! Batch partitioning properties: the chunked pipeline must touch every
//! record exactly once for any positive batch size.

mod common;

use common::{records, test_config, RecordingCollection, StubProvider};
use finterm::domain::entities::term_record::TermRecord;
use finterm::domain::values::batch_size::BatchSize;
use finterm::FinTerm;
use std::sync::Arc;

fn numbered_records(n: usize) -> Vec<TermRecord> {
    (0..n)
        .map(|i| TermRecord::new(format!("term {i}"), "category".to_string()).unwrap())
        .collect()
}

#[test]
fn test_zero_batch_size_rejected() {
    assert!(BatchSize::new(0).is_err());
    assert_eq!(BatchSize::new(1).unwrap().get(), 1);
}

#[tokio::test]
async fn test_batch_sizes_sum_to_total() {
    for &(total, embed_batch, insert_batch) in
        &[(1, 1, 1), (10, 3, 4), (23, 7, 5), (9, 500, 1000), (12, 12, 12)]
    {
        let config = test_config(4, embed_batch, insert_batch);
        let embedder = Arc::new(StubProvider::new(4));
        let collection = Arc::new(RecordingCollection::default());
        let ft = FinTerm::with_providers(config, collection.clone(), embedder.clone());

        ft.import(numbered_records(total), None, None).await.unwrap();

        let embed_calls = embedder.calls.lock().unwrap().clone();
        assert_eq!(embed_calls.iter().sum::<usize>(), total);
        assert!(embed_calls.iter().all(|&len| len <= embed_batch));
        assert_eq!(embed_calls.len(), total.div_ceil(embed_batch));

        let insert_batches = collection.insert_batches.lock().unwrap().clone();
        assert_eq!(insert_batches.iter().sum::<usize>(), total);
        assert!(insert_batches.iter().all(|&len| len <= insert_batch));
        assert_eq!(insert_batches.len(), total.div_ceil(insert_batch));
    }
}

#[tokio::test]
async fn test_only_final_batch_may_be_short() {
    let config = test_config(4, 4, 4);
    let embedder = Arc::new(StubProvider::new(4));
    let collection = Arc::new(RecordingCollection::default());
    let ft = FinTerm::with_providers(config, collection.clone(), embedder);

    ft.import(numbered_records(10), None, None).await.unwrap();

    let insert_batches = collection.insert_batches.lock().unwrap().clone();
    assert_eq!(insert_batches.as_slice(), &[4, 4, 2]);
}

#[tokio::test]
async fn test_lifecycle_order_recreate_insert_finalize() {
    let config = test_config(4, 2, 2);
    let collection = Arc::new(RecordingCollection::default());
    let ft = FinTerm::with_providers(config, collection.clone(), Arc::new(StubProvider::new(4)));

    ft.import(records(&[("a", "x"), ("b", "x"), ("c", "x")]), None, None)
        .await
        .unwrap();

    assert_eq!(*collection.recreated_with.lock().unwrap(), Some(4));
    assert!(*collection.finalized.lock().unwrap());
    // One trailing flush at minimum.
    assert!(*collection.flushes.lock().unwrap() >= 1);
}
