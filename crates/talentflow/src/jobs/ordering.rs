use std::fmt::Display;

use tracing::{debug, warn};

use super::domain::{Job, JobId, JobPage, JobQuery, JobStatus, Viewer};
use crate::config::ListingConfig;

/// The full, unfiltered job ordering.
///
/// Reorders always run against this collection rather than a filtered or
/// paginated view, since visible subsets are not contiguous in position space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobBoard {
    jobs: Vec<Job>,
}

impl JobBoard {
    /// Builds a board in stored position order. Ties keep their input order.
    pub fn from_jobs(mut jobs: Vec<Job>) -> Self {
        jobs.sort_by_key(|job| job.position);
        Self { jobs }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn into_jobs(self) -> Vec<Job> {
        self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, id: &JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| &job.id == id)
    }

    fn index_of(&self, id: &JobId) -> Option<usize> {
        self.jobs.iter().position(|job| &job.id == id)
    }

    /// Position the next appended job receives: one past the current maximum,
    /// or zero on an empty board.
    pub fn next_position(&self) -> u32 {
        self.jobs
            .iter()
            .map(|job| job.position)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Moves `from` to the index currently held by `to` (splice, not swap) and
    /// rewrites every position densely. Returns `false` without touching the
    /// board when either id is absent.
    pub fn reorder(&mut self, from: &JobId, to: &JobId) -> bool {
        let (Some(from_index), Some(to_index)) = (self.index_of(from), self.index_of(to)) else {
            debug!(%from, %to, "reorder ignored: job no longer on the board");
            return false;
        };

        let moved = self.jobs.remove(from_index);
        self.jobs.insert(to_index, moved);
        self.reindex();
        true
    }

    /// Optimistic reorder: the board changes first, then the from/to intent is
    /// handed to `sync`. A failed sync is logged and the local order is kept.
    pub fn reorder_and_sync<F, E>(&mut self, from: &JobId, to: &JobId, sync: F) -> bool
    where
        F: FnOnce(&JobId, &JobId) -> Result<(), E>,
        E: Display,
    {
        if !self.reorder(from, to) {
            return false;
        }

        if let Err(err) = sync(from, to) {
            warn!(%from, %to, error = %err, "durable job reorder failed; board keeps local order");
        }
        true
    }

    pub fn append(&mut self, mut job: Job) -> &Job {
        job.position = self.next_position();
        self.jobs.push(job);
        &self.jobs[self.jobs.len() - 1]
    }

    /// Status changes never move a job.
    pub fn set_status(&mut self, id: &JobId, status: JobStatus) -> Option<&Job> {
        let job = self.jobs.iter_mut().find(|job| &job.id == id)?;
        job.status = status;
        Some(job)
    }

    /// Rewrites positions to `0..n` in iteration order.
    pub fn reindex(&mut self) {
        for (index, job) in self.jobs.iter_mut().enumerate() {
            job.position = index as u32;
        }
    }

    pub fn positions(&self) -> Vec<(JobId, u32)> {
        self.jobs
            .iter()
            .map(|job| (job.id.clone(), job.position))
            .collect()
    }

    /// Status filter, then case-insensitive title search, then 1-based paging.
    /// `total` counts the filtered set before paging.
    pub fn page(&self, query: &JobQuery, viewer: Viewer, listing: &ListingConfig) -> JobPage {
        let filter = viewer.effective_filter(query.status);
        let needle = query.search.trim().to_lowercase();

        let matching: Vec<&Job> = self
            .jobs
            .iter()
            .filter(|job| filter.admits(job.status))
            .filter(|job| needle.is_empty() || job.title.to_lowercase().contains(&needle))
            .collect();

        let page_size = listing.resolve(query.page_size);
        let page = query.page.max(1);
        let start = (page - 1).saturating_mul(page_size);

        JobPage {
            total: matching.len(),
            jobs: matching
                .into_iter()
                .skip(start)
                .take(page_size)
                .cloned()
                .collect(),
        }
    }
}
