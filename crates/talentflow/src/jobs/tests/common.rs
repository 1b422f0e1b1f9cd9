use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::ListingConfig;
use crate::jobs::domain::{Job, JobId, JobStatus};
use crate::jobs::repository::{JobRepository, RepositoryError};
use crate::jobs::service::JobService;

pub(super) fn job(id: &str, title: &str, position: u32, status: JobStatus) -> Job {
    Job {
        id: JobId::from(id),
        title: title.to_string(),
        slug: crate::jobs::slugify(title),
        status,
        position,
        tags: vec!["Remote".to_string()],
    }
}

pub(super) fn abc() -> Vec<Job> {
    vec![
        job("a", "Backend Engineer", 0, JobStatus::Active),
        job("b", "Product Designer", 1, JobStatus::Archived),
        job("c", "Data Analyst", 2, JobStatus::Active),
    ]
}

pub(super) fn ids(jobs: &[Job]) -> Vec<&str> {
    jobs.iter().map(|job| job.id.as_str()).collect()
}

pub(super) fn positions(jobs: &[Job]) -> Vec<u32> {
    jobs.iter().map(|job| job.position).collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryJobs {
    pub(super) records: Arc<Mutex<HashMap<JobId, Job>>>,
    pub(super) position_writes: Arc<Mutex<usize>>,
}

impl MemoryJobs {
    pub(super) fn seeded(jobs: Vec<Job>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.records.lock().expect("repository mutex poisoned");
            for job in jobs {
                guard.insert(job.id.clone(), job);
            }
        }
        repository
    }

    pub(super) fn position_writes(&self) -> usize {
        *self.position_writes.lock().expect("counter mutex poisoned")
    }
}

impl JobRepository for MemoryJobs {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict("job already exists".to_string()));
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update(&self, job: Job) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&job.id) {
            Some(existing) => {
                *existing = job;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn ordered(&self) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut jobs: Vec<Job> = guard.values().cloned().collect();
        jobs.sort_by_key(|job| job.position);
        Ok(jobs)
    }

    fn write_positions(&self, positions: &[(JobId, u32)]) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        for (id, position) in positions {
            if let Some(job) = guard.get_mut(id) {
                job.position = *position;
            }
        }
        *self.position_writes.lock().expect("counter mutex poisoned") += 1;
        Ok(())
    }
}

pub(super) struct OfflineJobs;

impl JobRepository for OfflineJobs {
    fn insert(&self, _job: Job) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _job: Job) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn ordered(&self) -> Result<Vec<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn write_positions(&self, _positions: &[(JobId, u32)]) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (JobService<MemoryJobs>, Arc<MemoryJobs>) {
    let repository = Arc::new(MemoryJobs::seeded(abc()));
    let service = JobService::new(repository.clone(), ListingConfig::default());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
