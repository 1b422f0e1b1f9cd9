use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::candidates::domain::{Candidate, CandidateId, Stage, TimelineEvent};
use crate::candidates::repository::{CandidateRepository, RepositoryError};
use crate::candidates::service::CandidateService;
use crate::jobs::{Job, JobId, JobRepository, JobStatus};

pub(super) fn candidate(id: &str, name: &str, stage: Stage) -> Candidate {
    Candidate {
        id: CandidateId::from(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        job_id: JobId::from("job-1"),
        stage,
    }
}

pub(super) fn roster() -> Vec<Candidate> {
    vec![
        candidate("c1", "Ada Lovelace", Stage::Applied),
        candidate("c2", "Grace Hopper", Stage::Tech),
        candidate("c3", "Alan Turing", Stage::Applied),
        candidate("c4", "Edsger Dijkstra", Stage::Rejected),
    ]
}

#[derive(Default)]
struct CandidateTables {
    order: Vec<CandidateId>,
    records: HashMap<CandidateId, Candidate>,
    events: HashMap<CandidateId, Vec<TimelineEvent>>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryCandidates {
    tables: Arc<Mutex<CandidateTables>>,
}

impl MemoryCandidates {
    pub(super) fn seeded(candidates: Vec<Candidate>) -> Self {
        let repository = Self::default();
        for candidate in candidates {
            repository.insert(candidate).expect("seed insert");
        }
        repository
    }
}

impl CandidateRepository for MemoryCandidates {
    fn insert(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        if tables.records.contains_key(&candidate.id) {
            return Err(RepositoryError::Conflict("candidate already exists".to_string()));
        }
        tables.order.push(candidate.id.clone());
        tables.records.insert(candidate.id.clone(), candidate.clone());
        Ok(candidate)
    }

    fn update(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        match tables.records.get_mut(&candidate.id) {
            Some(existing) => {
                *existing = candidate;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.records.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<Candidate>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables
            .order
            .iter()
            .filter_map(|id| tables.records.get(id).cloned())
            .collect())
    }

    fn append_event(&self, id: &CandidateId, event: TimelineEvent) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        tables.events.entry(id.clone()).or_default().push(event);
        Ok(())
    }

    fn events(&self, id: &CandidateId) -> Result<Vec<TimelineEvent>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.events.get(id).cloned().unwrap_or_default())
    }
}

/// Read-only job lookup holding a single posting.
pub(super) struct SingleJob;

impl JobRepository for SingleJob {
    fn insert(&self, _job: Job) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn update(&self, _job: Job) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok((id.as_str() == "job-1").then(|| Job {
            id: id.clone(),
            title: "Compiler Engineer".to_string(),
            slug: "compiler-engineer".to_string(),
            status: JobStatus::Active,
            position: 0,
            tags: Vec::new(),
        }))
    }

    fn ordered(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(self.fetch(&JobId::from("job-1"))?.into_iter().collect())
    }

    fn write_positions(&self, _positions: &[(JobId, u32)]) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

pub(super) fn build_service() -> (
    CandidateService<MemoryCandidates, SingleJob>,
    Arc<MemoryCandidates>,
) {
    let repository = Arc::new(MemoryCandidates::seeded(roster()));
    let service = CandidateService::new(repository.clone(), Arc::new(SingleJob));
    (service, repository)
}

pub(super) fn names(candidates: &[Candidate]) -> Vec<&str> {
    candidates.iter().map(|candidate| candidate.name.as_str()).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
