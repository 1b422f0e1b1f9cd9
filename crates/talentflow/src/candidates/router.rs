use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::CandidateId;
use super::repository::{CandidateRepository, RepositoryError};
use super::service::{CandidateService, CandidateServiceError};
use crate::error::error_response;
use crate::jobs::JobRepository;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
}

/// The stage is taken as a raw string so unknown values surface as
/// `InvalidStage` instead of a body rejection.
#[derive(Debug, Deserialize)]
pub struct StageUpdate {
    pub stage: String,
}

/// Router builder exposing candidate listing, profile, timeline, and stage updates.
pub fn candidate_router<C, J>(service: Arc<CandidateService<C, J>>) -> Router
where
    C: CandidateRepository + 'static,
    J: JobRepository + 'static,
{
    Router::new()
        .route("/api/v1/candidates", get(list_handler::<C, J>))
        .route("/api/v1/candidates/board", get(board_handler::<C, J>))
        .route(
            "/api/v1/candidates/:candidate_id",
            get(profile_handler::<C, J>).patch(stage_handler::<C, J>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/timeline",
            get(timeline_handler::<C, J>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<C, J>(
    State(service): State<Arc<CandidateService<C, J>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    C: CandidateRepository + 'static,
    J: JobRepository + 'static,
{
    match service.list(&params.search) {
        Ok(candidates) => {
            (StatusCode::OK, Json(json!({ "candidates": candidates }))).into_response()
        }
        Err(err) => candidate_error_response(err),
    }
}

pub(crate) async fn board_handler<C, J>(
    State(service): State<Arc<CandidateService<C, J>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    C: CandidateRepository + 'static,
    J: JobRepository + 'static,
{
    match service.board(&params.search) {
        Ok(columns) => (StatusCode::OK, Json(json!({ "columns": columns }))).into_response(),
        Err(err) => candidate_error_response(err),
    }
}

pub(crate) async fn profile_handler<C, J>(
    State(service): State<Arc<CandidateService<C, J>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    J: JobRepository + 'static,
{
    match service.get(&CandidateId(candidate_id)) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => candidate_error_response(err),
    }
}

pub(crate) async fn timeline_handler<C, J>(
    State(service): State<Arc<CandidateService<C, J>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    J: JobRepository + 'static,
{
    match service.timeline(&CandidateId(candidate_id)) {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(err) => candidate_error_response(err),
    }
}

pub(crate) async fn stage_handler<C, J>(
    State(service): State<Arc<CandidateService<C, J>>>,
    Path(candidate_id): Path<String>,
    Json(update): Json<StageUpdate>,
) -> Response
where
    C: CandidateRepository + 'static,
    J: JobRepository + 'static,
{
    match service.move_stage(&CandidateId(candidate_id), &update.stage) {
        Ok(candidate) => (StatusCode::OK, Json(candidate)).into_response(),
        Err(err) => candidate_error_response(err),
    }
}

fn candidate_error_response(err: CandidateServiceError) -> Response {
    match err {
        CandidateServiceError::InvalidStage(_) | CandidateServiceError::UnknownJob(_) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        CandidateServiceError::Repository(RepositoryError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, "candidate not found")
        }
        CandidateServiceError::Repository(RepositoryError::Conflict(message)) => {
            error_response(StatusCode::CONFLICT, message)
        }
        CandidateServiceError::Repository(RepositoryError::Unavailable(reason)) => {
            tracing::warn!(%reason, "candidate repository unavailable");
            error_response(StatusCode::SERVICE_UNAVAILABLE, reason)
        }
    }
}
