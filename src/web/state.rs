use crate::application::import_terms::ImportSummary;
use crate::FinTerm;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub finterm: Arc<FinTerm>,
    pub jobs: Arc<RwLock<HashMap<Uuid, ImportJob>>>,
}

impl AppState {
    pub fn new(ft: FinTerm) -> Self {
        Self {
            finterm: Arc::new(ft),
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Apply a mutation to one job, ignoring a poisoned lock (a panicked
    /// writer only costs a stale progress read).
    pub fn update_job(&self, id: Uuid, apply: impl FnOnce(&mut ImportJob)) {
        if let Ok(mut jobs) = self.jobs.write() {
            if let Some(job) = jobs.get_mut(&id) {
                apply(job);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    Embedding,
    Inserting,
    Done,
    Failed,
}

/// Progress of one background import, polled by the UI.
#[derive(Debug, Clone, Serialize)]
pub struct ImportJob {
    pub phase: JobPhase,
    pub embed_done: usize,
    pub embed_total: usize,
    pub insert_done: usize,
    pub insert_total: usize,
    pub error: Option<String>,
    pub summary: Option<ImportSummary>,
}

impl ImportJob {
    pub fn new(total: usize) -> Self {
        Self {
            phase: JobPhase::Embedding,
            embed_done: 0,
            embed_total: total,
            insert_done: 0,
            insert_total: total,
            error: None,
            summary: None,
        }
    }
}
