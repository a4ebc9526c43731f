//! Networked collection backend speaking the Milvus HTTP v2 API
//! (`/v2/vectordb/...`). Used when the embedded mode toggle is off.

use crate::domain::entities::term_record::{TermMatch, TermRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::term_collection::{CollectionStats, TermCollection};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Mutex;

pub struct MilvusHttpCollection {
    client: Client,
    base_url: String,
    collection: String,
    /// Dimension sent at the last `recreate`; the server owns the schema,
    /// this is only a local echo for stats.
    dimension: Mutex<Option<usize>>,
    last_import_at: Mutex<Option<DateTime<Utc>>>,
}

impl MilvusHttpCollection {
    pub fn new(host: &str, port: u16, collection: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent("finterm/0.1")
                .build()
                .unwrap_or_default(),
            base_url: format!("http://{host}:{port}"),
            collection: collection.to_string(),
            dimension: Mutex::new(None),
            last_import_at: Mutex::new(None),
        }
    }

    /// POST one endpoint and unwrap the `{"code": 0, "data": ...}` envelope.
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value, DomainError> {
        let url = format!("{}/v2/vectordb/{endpoint}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Database(format!("Milvus request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DomainError::Database(format!("Milvus {status}: {text}")));
        }

        let envelope: Value = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("Milvus response parse error: {e}")))?;
        let code = envelope["code"].as_i64().unwrap_or(-1);
        if code != 0 {
            let message = envelope["message"].as_str().unwrap_or("unknown error");
            return Err(DomainError::Database(format!(
                "Milvus error {code}: {message}"
            )));
        }
        Ok(envelope["data"].clone())
    }

    async fn has_collection(&self) -> Result<bool, DomainError> {
        let data = self
            .post("collections/has", json!({ "collectionName": self.collection }))
            .await?;
        Ok(data["has"].as_bool().unwrap_or(false))
    }
}

#[async_trait::async_trait]
impl TermCollection for MilvusHttpCollection {
    async fn recreate(&self, dimension: usize) -> Result<(), DomainError> {
        if self.has_collection().await? {
            self.post("collections/drop", json!({ "collectionName": self.collection }))
                .await?;
            tracing::info!(collection = %self.collection, "Dropped existing collection");
        }

        let body = json!({
            "collectionName": self.collection,
            "schema": {
                "autoId": true,
                "enableDynamicField": false,
                "fields": [
                    { "fieldName": "id", "dataType": "Int64", "isPrimary": true },
                    {
                        "fieldName": "term",
                        "dataType": "VarChar",
                        "elementTypeParams": { "max_length": "500" }
                    },
                    {
                        "fieldName": "category",
                        "dataType": "VarChar",
                        "elementTypeParams": { "max_length": "100" }
                    },
                    {
                        "fieldName": "embedding",
                        "dataType": "FloatVector",
                        "elementTypeParams": { "dim": dimension.to_string() }
                    }
                ]
            },
            "indexParams": [
                {
                    "fieldName": "embedding",
                    "indexName": "embedding_idx",
                    "metricType": "COSINE",
                    "indexType": "AUTOINDEX"
                }
            ]
        });
        self.post("collections/create", body).await?;

        if let Ok(mut dim) = self.dimension.lock() {
            *dim = Some(dimension);
        }
        tracing::info!(collection = %self.collection, dimension, "Created collection");
        Ok(())
    }

    async fn insert_batch(
        &self,
        records: &[TermRecord],
        vectors: &[Vec<f32>],
    ) -> Result<usize, DomainError> {
        if records.len() != vectors.len() {
            return Err(DomainError::InvalidInput(format!(
                "Record/vector count mismatch: {} vs {}",
                records.len(),
                vectors.len()
            )));
        }
        let rows: Vec<Value> = records
            .iter()
            .zip(vectors.iter())
            .map(|(record, vector)| {
                json!({
                    "term": record.term,
                    "category": record.category,
                    "embedding": vector,
                })
            })
            .collect();
        let data = self
            .post(
                "entities/insert",
                json!({ "collectionName": self.collection, "data": rows }),
            )
            .await?;
        Ok(data["insertCount"].as_u64().unwrap_or(records.len() as u64) as usize)
    }

    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<TermMatch>, DomainError> {
        let data = self
            .post(
                "entities/search",
                json!({
                    "collectionName": self.collection,
                    "data": [vector],
                    "annsField": "embedding",
                    "limit": limit,
                    "outputFields": ["term", "category"],
                    "searchParams": { "metricType": "COSINE" }
                }),
            )
            .await?;

        let hits = data.as_array().cloned().unwrap_or_default();
        let matches = hits
            .iter()
            .map(|hit| TermMatch {
                term: hit["term"].as_str().unwrap_or_default().to_string(),
                category: hit["category"].as_str().unwrap_or_default().to_string(),
                score: hit["distance"].as_f64().or_else(|| hit["score"].as_f64()).unwrap_or(0.0),
            })
            .collect();
        Ok(matches)
    }

    async fn flush(&self) -> Result<(), DomainError> {
        self.post("collections/flush", json!({ "collectionName": self.collection }))
            .await?;
        Ok(())
    }

    async fn finalize(&self) -> Result<(), DomainError> {
        // Index params were supplied at create; loading makes it queryable.
        self.post("collections/load", json!({ "collectionName": self.collection }))
            .await?;
        if let Ok(mut at) = self.last_import_at.lock() {
            *at = Some(Utc::now());
        }
        Ok(())
    }

    async fn stats(&self) -> Result<CollectionStats, DomainError> {
        let data = self
            .post(
                "collections/get_stats",
                json!({ "collectionName": self.collection }),
            )
            .await?;
        let total = data["rowCount"].as_u64().unwrap_or(0) as usize;
        Ok(CollectionStats {
            collection_name: self.collection.clone(),
            total_terms: total,
            dimension: self.dimension.lock().ok().and_then(|d| *d),
            last_import_at: self.last_import_at.lock().ok().and_then(|a| *a),
        })
    }

    async fn stored_dimension(&self) -> Result<Option<usize>, DomainError> {
        Ok(self.dimension.lock().ok().and_then(|d| *d))
    }
}
