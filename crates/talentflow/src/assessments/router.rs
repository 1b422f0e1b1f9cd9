use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{AssessmentRepository, RepositoryError, SinkError, SubmissionSink};
use super::schema::AssessmentStructure;
use super::service::{AssessmentService, AssessmentServiceError};
use super::submission::SubmissionError;
use super::visibility::AnswerSet;
use crate::error::error_response;
use crate::jobs::JobId;

#[derive(Debug, Deserialize)]
pub struct SaveAssessmentRequest {
    pub structure: AssessmentStructure,
}

/// Router builder exposing the builder and runtime endpoints.
pub fn assessment_router<R, S>(service: Arc<AssessmentService<R, S>>) -> Router
where
    R: AssessmentRepository + 'static,
    S: SubmissionSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments/:job_id",
            get(get_handler::<R, S>).put(save_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:job_id/preview",
            get(preview_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:job_id/submit",
            post(submit_handler::<R, S>),
        )
        .with_state(service)
}

pub(crate) async fn get_handler<R, S>(
    State(service): State<Arc<AssessmentService<R, S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.get(&JobId(job_id)) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn save_handler<R, S>(
    State(service): State<Arc<AssessmentService<R, S>>>,
    Path(job_id): Path<String>,
    Json(request): Json<SaveAssessmentRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.save(&JobId(job_id), request.structure) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn preview_handler<R, S>(
    State(service): State<Arc<AssessmentService<R, S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.preview(&JobId(job_id)) {
        Ok(preview) => (StatusCode::OK, Json(preview)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn submit_handler<R, S>(
    State(service): State<Arc<AssessmentService<R, S>>>,
    Path(job_id): Path<String>,
    Json(answers): Json<AnswerSet>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.submit(&JobId(job_id), answers) {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

fn assessment_error_response(err: AssessmentServiceError) -> Response {
    match err {
        AssessmentServiceError::Schema(err) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        AssessmentServiceError::Submission(SubmissionError::ValidationFailed(failures)) => {
            let payload = json!({
                "error": "assessment failed validation",
                "failures": failures,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        AssessmentServiceError::Submission(SubmissionError::Sink(SinkError::Unavailable(
            reason,
        ))) => {
            tracing::warn!(%reason, "submission sink unavailable");
            error_response(StatusCode::SERVICE_UNAVAILABLE, reason)
        }
        AssessmentServiceError::Repository(RepositoryError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, "assessment not found")
        }
        AssessmentServiceError::Repository(RepositoryError::Conflict(message)) => {
            error_response(StatusCode::CONFLICT, message)
        }
        AssessmentServiceError::Repository(RepositoryError::Unavailable(reason)) => {
            tracing::warn!(%reason, "assessment repository unavailable");
            error_response(StatusCode::SERVICE_UNAVAILABLE, reason)
        }
    }
}
