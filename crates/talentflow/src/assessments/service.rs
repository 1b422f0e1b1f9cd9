use std::sync::Arc;

use tracing::{info, warn};

use super::preview::{preview, Preview};
use super::repository::{AssessmentRepository, RepositoryError};
use super::schema::{Assessment, AssessmentStructure, SchemaError};
use super::submission::{submit, SubmissionError, SubmissionReceipt, SubmissionSink};
use super::visibility::AnswerSet;
use crate::jobs::JobId;

/// Service composing assessment storage with the submission sink.
pub struct AssessmentService<R, S> {
    repository: Arc<R>,
    sink: Arc<S>,
}

impl<R, S> AssessmentService<R, S>
where
    R: AssessmentRepository + 'static,
    S: SubmissionSink + 'static,
{
    pub fn new(repository: Arc<R>, sink: Arc<S>) -> Self {
        Self { repository, sink }
    }

    /// Stored assessment for the job; a blank one is created and persisted
    /// on first access.
    pub fn get(&self, job_id: &JobId) -> Result<Assessment, AssessmentServiceError> {
        if let Some(existing) = self.repository.fetch(job_id)? {
            return Ok(existing);
        }

        let created = self.repository.put(Assessment::blank(job_id.clone()))?;
        info!(job_id = %job_id, "blank assessment created");
        Ok(created)
    }

    /// The only write path for a structure. Nothing is stored when the
    /// structure fails its checks.
    pub fn save(
        &self,
        job_id: &JobId,
        structure: AssessmentStructure,
    ) -> Result<Assessment, AssessmentServiceError> {
        if let Err(err) = structure.check() {
            warn!(job_id = %job_id, error = %err, "assessment save rejected");
            return Err(err.into());
        }

        let saved = self.repository.put(Assessment {
            job_id: job_id.clone(),
            structure,
        })?;
        info!(
            job_id = %job_id,
            sections = saved.structure.sections.len(),
            questions = saved.structure.flattened().count(),
            "assessment saved"
        );
        Ok(saved)
    }

    pub fn preview(&self, job_id: &JobId) -> Result<Preview, AssessmentServiceError> {
        let assessment = self.get(job_id)?;
        Ok(preview(&assessment.structure))
    }

    pub fn submit(
        &self,
        job_id: &JobId,
        answers: AnswerSet,
    ) -> Result<SubmissionReceipt, AssessmentServiceError> {
        let assessment = self
            .repository
            .fetch(job_id)?
            .ok_or(RepositoryError::NotFound)?;

        Ok(submit(
            &assessment.structure,
            job_id,
            answers,
            self.sink.as_ref(),
        )?)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
