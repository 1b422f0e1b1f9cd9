use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talentflow::assessments::{
    Assessment, AssessmentRepository, AssessmentService, AssessmentStructure, Conditional,
    Question, QuestionId, QuestionKind, Section, SectionId, SinkError, Submission,
    SubmissionSink, Validation,
};
use talentflow::candidates::{
    Candidate, CandidateId, CandidateRepository, CandidateService, NewCandidate, TimelineEvent,
};
use talentflow::config::ListingConfig;
use talentflow::error::AppError;
use talentflow::jobs::{Job, JobId, JobRepository, JobService, JobStatus, NewJob};
use talentflow::repository::RepositoryError;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryJobRepository {
    records: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl JobRepository for InMemoryJobRepository {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict(format!(
                "job '{}' already exists",
                job.id
            )));
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update(&self, job: Job) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&job.id) {
            guard.insert(job.id.clone(), job);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn ordered(&self) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut jobs: Vec<Job> = guard.values().cloned().collect();
        jobs.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        Ok(jobs)
    }

    fn write_positions(&self, positions: &[(JobId, u32)]) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        for (id, position) in positions {
            if let Some(job) = guard.get_mut(id) {
                job.position = *position;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct CandidateTables {
    order: Vec<CandidateId>,
    records: HashMap<CandidateId, Candidate>,
    events: HashMap<CandidateId, Vec<TimelineEvent>>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateRepository {
    tables: Arc<Mutex<CandidateTables>>,
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn insert(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        if tables.records.contains_key(&candidate.id) {
            return Err(RepositoryError::Conflict(format!(
                "candidate '{}' already exists",
                candidate.id
            )));
        }
        tables.order.push(candidate.id.clone());
        tables
            .records
            .insert(candidate.id.clone(), candidate.clone());
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<JobId, Assessment>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn fetch(&self, job_id: &JobId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(job_id).cloned())
    }

    fn put(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(assessment.job_id.clone(), assessment.clone());
        Ok(assessment)
    }
}

/// Keeps accepted submissions in memory; nothing is forwarded anywhere.
#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionSink {
    submissions: Arc<Mutex<Vec<Submission>>>,
}

impl SubmissionSink for InMemorySubmissionSink {
    fn deliver(&self, submission: Submission) -> Result<(), SinkError> {
        info!(
            job_id = %submission.job_id,
            answers = submission.answers.len(),
            "assessment submission received"
        );
        let mut guard = self.submissions.lock().expect("submission mutex poisoned");
        guard.push(submission);
        Ok(())
    }
}

impl InMemorySubmissionSink {
    pub(crate) fn submissions(&self) -> Vec<Submission> {
        self.submissions
            .lock()
            .expect("submission mutex poisoned")
            .clone()
    }
}

pub(crate) type Jobs = JobService<InMemoryJobRepository>;
pub(crate) type Candidates = CandidateService<InMemoryCandidateRepository, InMemoryJobRepository>;
pub(crate) type Assessments =
    AssessmentService<InMemoryAssessmentRepository, InMemorySubmissionSink>;

/// Services wired over the in-memory stores.
#[derive(Clone)]
pub(crate) struct Platform {
    pub(crate) jobs: Arc<Jobs>,
    pub(crate) candidates: Arc<Candidates>,
    pub(crate) assessments: Arc<Assessments>,
    pub(crate) submissions: Arc<InMemorySubmissionSink>,
}

impl Platform {
    pub(crate) fn in_memory(listing: ListingConfig) -> Self {
        let job_store = Arc::new(InMemoryJobRepository::default());
        let submissions = Arc::new(InMemorySubmissionSink::default());
        Self {
            jobs: Arc::new(JobService::new(job_store.clone(), listing)),
            candidates: Arc::new(CandidateService::new(
                Arc::new(InMemoryCandidateRepository::default()),
                job_store,
            )),
            assessments: Arc::new(AssessmentService::new(
                Arc::new(InMemoryAssessmentRepository::default()),
                submissions.clone(),
            )),
            submissions,
        }
    }
}

/// Identifiers produced by [`seed_sample_data`].
#[derive(Debug, Clone)]
pub(crate) struct SampleData {
    pub(crate) jobs: Vec<JobId>,
    pub(crate) candidates: Vec<CandidateId>,
}

const SAMPLE_JOBS: [(&str, JobStatus, &[&str]); 4] = [
    ("Backend Engineer", JobStatus::Active, &["rust", "remote"]),
    ("Product Designer", JobStatus::Archived, &["design"]),
    ("Data Analyst", JobStatus::Active, &["sql"]),
    ("Site Reliability Engineer", JobStatus::Active, &["on-call", "remote"]),
];

const SAMPLE_CANDIDATES: [(&str, &str, usize, &str); 5] = [
    ("Ada Lovelace", "ada@example.com", 0, "applied"),
    ("Grace Hopper", "grace@example.com", 0, "tech"),
    ("Alan Turing", "alan@example.com", 2, "screen"),
    ("Radia Perlman", "radia@example.com", 3, "offer"),
    ("Edsger Dijkstra", "edsger@example.com", 2, "rejected"),
];

/// Deterministic fixture data created through the services so every stored
/// record obeys the same rules as live traffic.
pub(crate) fn seed_sample_data(platform: &Platform) -> Result<SampleData, AppError> {
    let mut jobs = Vec::with_capacity(SAMPLE_JOBS.len());
    for (title, status, tags) in SAMPLE_JOBS {
        let job = platform.jobs.create(NewJob {
            title: title.to_string(),
            slug: None,
            status,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        })?;
        jobs.push(job.id);
    }

    let mut candidates = Vec::with_capacity(SAMPLE_CANDIDATES.len());
    for (name, email, job_index, stage) in SAMPLE_CANDIDATES {
        let candidate = platform.candidates.register(NewCandidate {
            name: name.to_string(),
            email: email.to_string(),
            job_id: jobs[job_index].clone(),
        })?;
        platform.candidates.move_stage(&candidate.id, stage)?;
        candidates.push(candidate.id);
    }

    platform.assessments.save(&jobs[0], sample_assessment())?;

    info!(
        jobs = jobs.len(),
        candidates = candidates.len(),
        "sample data loaded"
    );
    Ok(SampleData { jobs, candidates })
}

pub(crate) fn sample_assessment() -> AssessmentStructure {
    let question = |id: &str, kind: QuestionKind, label: &str| Question {
        id: QuestionId::from(id),
        kind,
        label: label.to_string(),
        options: Vec::new(),
        validation: Validation::default(),
        conditional: None,
    };

    let mut rust = question(
        "q-rust",
        QuestionKind::SingleChoice,
        "Have you shipped Rust in production?",
    );
    rust.options = vec!["Yes".to_string(), "No".to_string()];
    rust.validation.required = true;

    let mut project = question("q-project", QuestionKind::LongText, "Describe that service");
    project.validation.required = true;
    project.conditional = Some(Conditional {
        question_id: QuestionId::from("q-rust"),
        required_answer: "Yes".to_string(),
    });

    let mut years = question("q-years", QuestionKind::Numeric, "Years of backend experience");
    years.validation = Validation {
        required: true,
        min: Some(0.0),
        max: Some(40.0),
    };

    AssessmentStructure {
        title: "Backend Engineer Screening".to_string(),
        sections: vec![
            Section {
                id: SectionId::from("s-background"),
                title: "Background".to_string(),
                questions: vec![rust, project],
            },
            Section {
                id: SectionId::from("s-experience"),
                title: "Experience".to_string(),
                questions: vec![years],
            },
        ],
    }
}
