//! Embedded collection backend: one SQLite file, one table per collection,
//! vectors stored as little-endian f32 blobs, brute-force cosine scan.

use crate::domain::entities::term_record::{TermMatch, TermRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::term_collection::{CollectionStats, TermCollection};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug)]
pub struct SqliteTermCollection {
    conn: Mutex<Connection>,
    collection: String,
}

impl SqliteTermCollection {
    /// Open (or create) the database file and make sure the meta table
    /// exists. The parent directory is created if missing.
    pub fn open(db_path: &str, collection: &str) -> Result<Self, DomainError> {
        validate_collection_name(collection)?;
        if db_path != ":memory:" {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        DomainError::Database(format!("Failed to create {}: {e}", parent.display()))
                    })?;
                }
            }
        }
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS collection_meta (
                collection TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (collection, key)
            );",
        )
        .map_err(|e| DomainError::Database(format!("Migration failed: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
            collection: collection.to_string(),
        })
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }
        let mut dot = 0.0_f64;
        let mut norm_a = 0.0_f64;
        let mut norm_b = 0.0_f64;
        for (x, y) in a.iter().zip(b.iter()) {
            let x = *x as f64;
            let y = *y as f64;
            dot += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }
        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom == 0.0 {
            0.0
        } else {
            dot / denom
        }
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn get_meta(&self, conn: &Connection, key: &str) -> Result<Option<String>, DomainError> {
        let mut stmt = conn
            .prepare("SELECT value FROM collection_meta WHERE collection = ?1 AND key = ?2")
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut rows = stmt
            .query_map(params![self.collection, key], |r| r.get::<_, String>(0))
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(rows.next().and_then(|r| r.ok()))
    }

    fn set_meta(&self, conn: &Connection, key: &str, value: &str) -> Result<(), DomainError> {
        conn.execute(
            "INSERT OR REPLACE INTO collection_meta (collection, key, value) VALUES (?1, ?2, ?3)",
            params![self.collection, key, value],
        )
        .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Collection names become table names, so restrict them to identifier
/// characters.
fn validate_collection_name(name: &str) -> Result<(), DomainError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !ok {
        return Err(DomainError::InvalidInput(format!(
            "Collection name must be alphanumeric/underscore, got '{name}'"
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl TermCollection for SqliteTermCollection {
    async fn recreate(&self, dimension: usize) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {name};
             CREATE TABLE {name} (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 term TEXT NOT NULL,
                 category TEXT NOT NULL,
                 embedding BLOB NOT NULL
             );",
            name = self.collection
        ))
        .map_err(|e| DomainError::Database(format!("Failed to recreate collection: {e}")))?;
        self.set_meta(&conn, "dimension", &dimension.to_string())?;
        tracing::info!(collection = %self.collection, dimension, "Recreated collection");
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
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO {} (term, category, embedding) VALUES (?1, ?2, ?3)",
                    self.collection
                ))
                .map_err(|e| DomainError::Database(e.to_string()))?;
            for (record, vector) in records.iter().zip(vectors.iter()) {
                let blob = Self::serialize_vector(vector);
                stmt.execute(params![record.term, record.category, blob])
                    .map_err(|e| DomainError::Database(format!("Failed to insert term: {e}")))?;
            }
        }
        tx.commit()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(records.len())
    }

    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<TermMatch>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT term, category, embedding FROM {}",
                self.collection
            ))
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut results: Vec<TermMatch> = stmt
            .query_map([], |row| {
                let term: String = row.get(0)?;
                let category: String = row.get(1)?;
                let blob: Vec<u8> = row.get(2)?;
                Ok((term, category, blob))
            })
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .map(|(term, category, blob)| {
                let stored = Self::deserialize_vector(&blob);
                TermMatch {
                    term,
                    category,
                    score: Self::cosine_similarity(vector, &stored),
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);
        Ok(results)
    }

    async fn flush(&self) -> Result<(), DomainError> {
        // Inserts commit per batch; nothing buffered here.
        Ok(())
    }

    async fn finalize(&self) -> Result<(), DomainError> {
        // A brute-force scan needs no index build; just record the import time.
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        self.set_meta(&conn, "last_import_at", &Utc::now().to_rfc3339())?;
        Ok(())
    }

    async fn stats(&self) -> Result<CollectionStats, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let total: usize = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.collection), [], |r| {
                r.get(0)
            })
            .unwrap_or(0);
        let dimension = self
            .get_meta(&conn, "dimension")?
            .and_then(|s| s.parse::<usize>().ok());
        let last_import_at = self
            .get_meta(&conn, "last_import_at")?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));
        Ok(CollectionStats {
            collection_name: self.collection.clone(),
            total_terms: total,
            dimension,
            last_import_at,
        })
    }

    async fn stored_dimension(&self) -> Result<Option<usize>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(self
            .get_meta(&conn, "dimension")?
            .and_then(|s| s.parse::<usize>().ok()))
    }
}
