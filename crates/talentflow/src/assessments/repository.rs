use super::schema::Assessment;
pub use super::submission::{SinkError, SubmissionSink};
use crate::jobs::JobId;
pub use crate::repository::RepositoryError;

/// Storage abstraction for assessments, one per job.
pub trait AssessmentRepository: Send + Sync {
    fn fetch(&self, job_id: &JobId) -> Result<Option<Assessment>, RepositoryError>;
    /// Insert or replace the assessment for `assessment.job_id`.
    fn put(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
}
