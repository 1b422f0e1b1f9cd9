use std::sync::Arc;

use tracing::info;

use super::domain::{
    Candidate, CandidateId, CandidateProfile, InvalidStage, NewCandidate, Stage, TimelineEvent,
};
use super::pipeline::{group_by_stage, StageColumn};
use super::repository::{CandidateRepository, RepositoryError};
use crate::jobs::{JobId, JobRepository};

const MISSING_JOB_TITLE: &str = "N/A";

/// Service composing candidate storage with the job lookup used for profiles.
pub struct CandidateService<C, J> {
    candidates: Arc<C>,
    jobs: Arc<J>,
}

impl<C, J> CandidateService<C, J>
where
    C: CandidateRepository + 'static,
    J: JobRepository + 'static,
{
    pub fn new(candidates: Arc<C>, jobs: Arc<J>) -> Self {
        Self { candidates, jobs }
    }

    /// Case-insensitive substring match on name or email; blank search lists everyone.
    pub fn list(&self, search: &str) -> Result<Vec<Candidate>, CandidateServiceError> {
        let needle = search.trim().to_lowercase();
        let candidates = self.candidates.all()?;
        if needle.is_empty() {
            return Ok(candidates);
        }

        Ok(candidates
            .into_iter()
            .filter(|candidate| {
                candidate.name.to_lowercase().contains(&needle)
                    || candidate.email.to_lowercase().contains(&needle)
            })
            .collect())
    }

    pub fn board(&self, search: &str) -> Result<Vec<StageColumn>, CandidateServiceError> {
        let candidates = self.list(search)?;
        Ok(group_by_stage(&candidates))
    }

    pub fn get(&self, id: &CandidateId) -> Result<CandidateProfile, CandidateServiceError> {
        let candidate = self.fetch(id)?;
        let job_title = self
            .jobs
            .fetch(&candidate.job_id)?
            .map(|job| job.title)
            .unwrap_or_else(|| MISSING_JOB_TITLE.to_string());

        Ok(CandidateProfile {
            candidate,
            job_title,
        })
    }

    /// Activity history, newest first.
    pub fn timeline(&self, id: &CandidateId) -> Result<Vec<TimelineEvent>, CandidateServiceError> {
        self.fetch(id)?;
        let mut events = self.candidates.events(id)?;
        // Reverse first so same-instant events keep newest-appended first.
        events.reverse();
        events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(events)
    }

    pub fn register(&self, new_candidate: NewCandidate) -> Result<Candidate, CandidateServiceError> {
        let job = self
            .jobs
            .fetch(&new_candidate.job_id)?
            .ok_or_else(|| CandidateServiceError::UnknownJob(new_candidate.job_id.clone()))?;

        let candidate = self.candidates.insert(Candidate {
            id: CandidateId::generate(),
            name: new_candidate.name.trim().to_string(),
            email: new_candidate.email.trim().to_lowercase(),
            job_id: new_candidate.job_id,
            stage: Stage::Applied,
        })?;
        self.candidates
            .append_event(&candidate.id, TimelineEvent::applied(&job.title))?;

        info!(candidate_id = %candidate.id, job_id = %candidate.job_id, "candidate registered");
        Ok(candidate)
    }

    /// Durable stage update. Any stage may follow any other; moving to the
    /// current stage succeeds without recording an event.
    pub fn move_stage(
        &self,
        id: &CandidateId,
        stage: &str,
    ) -> Result<Candidate, CandidateServiceError> {
        let target: Stage = stage.parse()?;
        let mut candidate = self.fetch(id)?;

        let previous = candidate.stage;
        if previous == target {
            return Ok(candidate);
        }

        candidate.stage = target;
        self.candidates.update(candidate.clone())?;
        self.candidates
            .append_event(id, TimelineEvent::stage_change(previous, target))?;

        info!(candidate_id = %id, from = %previous, to = %target, "candidate stage updated");
        Ok(candidate)
    }

    fn fetch(&self, id: &CandidateId) -> Result<Candidate, RepositoryError> {
        self.candidates.fetch(id)?.ok_or(RepositoryError::NotFound)
    }
}

/// Error raised by the candidate service.
#[derive(Debug, thiserror::Error)]
pub enum CandidateServiceError {
    #[error(transparent)]
    InvalidStage(#[from] InvalidStage),
    #[error("job '{0}' does not exist")]
    UnknownJob(JobId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
