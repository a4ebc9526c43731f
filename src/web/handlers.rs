use crate::domain::ports::term_collection::CollectionStats;
use crate::infrastructure::csv::term_file::read_term_records;
use crate::web::error::ApiError;
use crate::web::state::{AppState, ImportJob, JobPhase};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// GET / - embedded single-page UI.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn default_top_k() -> usize {
    5
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<crate::domain::entities::term_record::TermMatch>,
}

/// POST /api/v1/search
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state.finterm.search(&req.query, req.top_k).await?;
    Ok(Json(SearchResponse { results }))
}

/// GET /api/v1/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<CollectionStats>, ApiError> {
    let stats = state.finterm.stats().await?;
    Ok(Json(stats))
}

#[derive(Serialize)]
pub struct ImportStarted {
    pub job_id: Uuid,
    pub total: usize,
}

/// POST /api/v1/import - raw CSV request body. Parses up front so malformed
/// input fails the request, then runs the import as a background task the
/// UI polls via the job id.
pub async fn import(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportStarted>, ApiError> {
    let records = read_term_records(body.as_ref(), state.finterm.config().row_limit)?;
    let total = records.len();

    let job_id = Uuid::new_v4();
    if let Ok(mut jobs) = state.jobs.write() {
        jobs.insert(job_id, ImportJob::new(total));
    }

    let task_state = state.clone();
    tokio::spawn(async move {
        let embed_state = task_state.clone();
        let insert_state = task_state.clone();
        let result = task_state
            .finterm
            .import(
                records,
                Some(&move |done, _total| {
                    embed_state.update_job(job_id, |job| job.embed_done = done);
                }),
                Some(&move |done, _total| {
                    insert_state.update_job(job_id, |job| {
                        job.phase = JobPhase::Inserting;
                        job.insert_done = done;
                    });
                }),
            )
            .await;

        match result {
            Ok(summary) => task_state.update_job(job_id, |job| {
                job.phase = JobPhase::Done;
                job.embed_done = job.embed_total;
                job.insert_done = job.insert_total;
                job.summary = Some(summary);
            }),
            Err(e) => {
                tracing::error!(job = %job_id, "Import failed: {e}");
                task_state.update_job(job_id, |job| {
                    job.phase = JobPhase::Failed;
                    job.error = Some(e.to_string());
                });
            }
        }
    });

    Ok(Json(ImportStarted { job_id, total }))
}

/// GET /api/v1/import/{id}
pub async fn import_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ImportJob>, ApiError> {
    let job = state
        .jobs
        .read()
        .ok()
        .and_then(|jobs| jobs.get(&id).cloned())
        .ok_or_else(|| ApiError::NotFound(format!("No import job {id}")))?;
    Ok(Json(job))
}
