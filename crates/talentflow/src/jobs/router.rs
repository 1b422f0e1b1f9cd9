use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{JobId, JobPatch, JobQuery, NewJob, StatusFilter, Viewer};
use super::repository::{JobRepository, RepositoryError};
use super::service::{JobService, JobServiceError};
use crate::error::error_response;

/// Query string accepted by the job listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListJobsParams {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<StatusFilter>,
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub view: Option<Viewer>,
}

impl ListJobsParams {
    fn into_query(self) -> (JobQuery, Viewer) {
        let query = JobQuery {
            page: self.page.unwrap_or(1),
            search: self.search.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            page_size: self.page_size.unwrap_or(0),
        };
        (query, self.view.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    #[serde(alias = "fromId")]
    pub from_id: JobId,
    #[serde(alias = "toId")]
    pub to_id: JobId,
}

/// Router builder exposing the job board endpoints.
pub fn job_router<R>(service: Arc<JobService<R>>) -> Router
where
    R: JobRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/v1/jobs/reorder", patch(reorder_handler::<R>))
        .route(
            "/api/v1/jobs/:job_id",
            get(get_handler::<R>).patch(update_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    Query(params): Query<ListJobsParams>,
) -> Response
where
    R: JobRepository + 'static,
{
    let (query, viewer) = params.into_query();
    match service.list(&query, viewer) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.get(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    Json(new_job): Json<NewJob>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.create(new_job) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    Path(job_id): Path<String>,
    Json(patch): Json<JobPatch>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.update(&JobId(job_id), patch) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => job_error_response(err),
    }
}

/// Missing ids are a silent no-op: drag targets can vanish mid-gesture.
pub(crate) async fn reorder_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    Json(request): Json<ReorderRequest>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.reorder(&request.from_id, &request.to_id) {
        Ok(_) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(err) => job_error_response(err),
    }
}

fn job_error_response(err: JobServiceError) -> Response {
    match err {
        JobServiceError::MissingTitle => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        JobServiceError::Repository(RepositoryError::Conflict(message)) => {
            error_response(StatusCode::CONFLICT, message)
        }
        JobServiceError::Repository(RepositoryError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, "job not found")
        }
        JobServiceError::Repository(RepositoryError::Unavailable(reason)) => {
            tracing::warn!(%reason, "job repository unavailable");
            error_response(StatusCode::SERVICE_UNAVAILABLE, reason)
        }
    }
}
