use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use super::domain::{
    normalize_tags, slugify, Job, JobId, JobPage, JobPatch, JobQuery, JobStatus, NewJob, Viewer,
};
use super::ordering::JobBoard;
use super::repository::{JobRepository, RepositoryError};
use crate::config::ListingConfig;

/// Service composing the job repository with the ordering rules.
///
/// Writes that read the board before storing (create, slug changes, reorder)
/// run one at a time so positions stay dense and slugs stay unique.
pub struct JobService<R> {
    repository: Arc<R>,
    listing: ListingConfig,
    writes: Mutex<()>,
}

impl<R> JobService<R>
where
    R: JobRepository + 'static,
{
    pub fn new(repository: Arc<R>, listing: ListingConfig) -> Self {
        Self {
            repository,
            listing,
            writes: Mutex::new(()),
        }
    }

    fn write_lock(&self) -> MutexGuard<'_, ()> {
        // The guard protects no data, so a poisoned lock is still usable.
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn board(&self) -> Result<JobBoard, RepositoryError> {
        Ok(JobBoard::from_jobs(self.repository.ordered()?))
    }

    pub fn list(&self, query: &JobQuery, viewer: Viewer) -> Result<JobPage, JobServiceError> {
        let board = self.board()?;
        Ok(board.page(query, viewer, &self.listing))
    }

    pub fn get(&self, id: &JobId) -> Result<Job, JobServiceError> {
        let job = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(job)
    }

    /// Create a job at the end of the board.
    pub fn create(&self, new_job: NewJob) -> Result<Job, JobServiceError> {
        let title = new_job.title.trim().to_string();
        if title.is_empty() {
            return Err(JobServiceError::MissingTitle);
        }

        let slug = match new_job.slug.as_deref().map(slugify) {
            Some(slug) if !slug.is_empty() => slug,
            _ => slugify(&title),
        };

        let _writes = self.write_lock();
        let mut board = self.board()?;
        ensure_slug_available(&board, &slug, None)?;

        let appended = board
            .append(Job {
                id: JobId::generate(),
                title,
                slug,
                status: new_job.status,
                position: 0,
                tags: normalize_tags(new_job.tags),
            })
            .clone();

        let stored = self.repository.insert(appended)?;
        info!(job_id = %stored.id, position = stored.position, "job created");
        Ok(stored)
    }

    /// Apply a partial update. Positions are never touched here.
    pub fn update(&self, id: &JobId, patch: JobPatch) -> Result<Job, JobServiceError> {
        let _writes = self.write_lock();
        let mut job = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;

        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(JobServiceError::MissingTitle);
            }
            job.title = title;
        }

        if let Some(slug) = patch.slug {
            let slug = match slugify(&slug) {
                slug if slug.is_empty() => slugify(&job.title),
                slug => slug,
            };
            if slug != job.slug {
                ensure_slug_available(&self.board()?, &slug, Some(id))?;
                job.slug = slug;
            }
        }

        if let Some(status) = patch.status {
            job.status = status;
        }

        if let Some(tags) = patch.tags {
            job.tags = normalize_tags(tags);
        }

        self.repository.update(job.clone())?;
        info!(job_id = %job.id, slug = %job.slug, status = job.status.label(), "job updated");
        Ok(job)
    }

    pub fn set_status(&self, id: &JobId, status: JobStatus) -> Result<Job, JobServiceError> {
        self.update(
            id,
            JobPatch {
                status: Some(status),
                ..JobPatch::default()
            },
        )
    }

    /// Applies the canonical splice reorder to the full stored ordering.
    /// Returns `false` (and writes nothing) when either id is unknown.
    pub fn reorder(&self, from: &JobId, to: &JobId) -> Result<bool, JobServiceError> {
        let _writes = self.write_lock();
        let mut board = self.board()?;
        if !board.reorder(from, to) {
            return Ok(false);
        }

        self.repository.write_positions(&board.positions())?;
        info!(%from, %to, "jobs reordered");
        Ok(true)
    }
}

fn ensure_slug_available(
    board: &JobBoard,
    slug: &str,
    owner: Option<&JobId>,
) -> Result<(), RepositoryError> {
    let taken = board
        .jobs()
        .iter()
        .any(|job| job.slug == slug && Some(&job.id) != owner);
    if taken {
        return Err(RepositoryError::Conflict(format!(
            "slug '{slug}' is already in use"
        )));
    }
    Ok(())
}

/// Error raised by the job service.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("job title is required")]
    MissingTitle,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
