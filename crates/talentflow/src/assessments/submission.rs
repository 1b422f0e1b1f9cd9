use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::schema::AssessmentStructure;
use super::visibility::{failures, AnswerSet, QuestionFailure};
use crate::jobs::JobId;

pub const SUBMITTED_MESSAGE: &str = "Assessment submitted successfully!";

/// Durable destination for accepted submissions.
pub trait SubmissionSink: Send + Sync {
    fn deliver(&self, submission: Submission) -> Result<(), SinkError>;
}

/// Payload handed to the sink: the full answer map, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub job_id: JobId,
    pub answers: AnswerSet,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("submission transport unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub success: bool,
    pub message: String,
}

impl SubmissionReceipt {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: SUBMITTED_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("{} question(s) failed validation", .0.len())]
    ValidationFailed(Vec<QuestionFailure>),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Validates every visible question and, only when all pass, delivers the
/// answers to `sink` exactly once.
pub fn submit<S>(
    structure: &AssessmentStructure,
    job_id: &JobId,
    answers: AnswerSet,
    sink: &S,
) -> Result<SubmissionReceipt, SubmissionError>
where
    S: SubmissionSink + ?Sized,
{
    let failed = failures(structure, &answers);
    if !failed.is_empty() {
        warn!(job_id = %job_id, failures = failed.len(), "submission rejected");
        return Err(SubmissionError::ValidationFailed(failed));
    }

    let answered = answers.len();
    sink.deliver(Submission {
        job_id: job_id.clone(),
        answers,
        submitted_at: Utc::now(),
    })?;

    info!(job_id = %job_id, answered, "assessment submitted");
    Ok(SubmissionReceipt::accepted())
}
