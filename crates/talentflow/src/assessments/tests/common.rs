use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessments::repository::{
    AssessmentRepository, RepositoryError, SinkError, SubmissionSink,
};
use crate::assessments::schema::{
    Assessment, AssessmentStructure, Conditional, Question, QuestionId, QuestionKind, Section,
    SectionId, Validation,
};
use crate::assessments::service::AssessmentService;
use crate::assessments::submission::Submission;
use crate::assessments::visibility::{Answer, AnswerSet};
use crate::jobs::JobId;

pub(super) fn question(id: &str, kind: QuestionKind, label: &str) -> Question {
    Question {
        id: QuestionId::from(id),
        kind,
        label: label.to_string(),
        options: if kind.is_choice() {
            vec!["Yes".to_string(), "No".to_string()]
        } else {
            Vec::new()
        },
        validation: Validation::default(),
        conditional: None,
    }
}

pub(super) fn depends(mut question: Question, on: &str, answer: &str) -> Question {
    question.conditional = Some(Conditional {
        question_id: QuestionId::from(on),
        required_answer: answer.to_string(),
    });
    question
}

pub(super) fn required(mut question: Question) -> Question {
    question.validation.required = true;
    question
}

pub(super) fn ranged(mut question: Question, min: f64, max: f64) -> Question {
    question.validation.min = Some(min);
    question.validation.max = Some(max);
    question
}

/// Two sections: a screening question gating a required follow-up, then a
/// bounded numeric question.
pub(super) fn screening() -> AssessmentStructure {
    AssessmentStructure {
        title: "Backend Screening".to_string(),
        sections: vec![
            Section {
                id: SectionId::from("s-1"),
                title: "Background".to_string(),
                questions: vec![
                    question("q1", QuestionKind::SingleChoice, "Worked with Rust?"),
                    required(depends(
                        question("q2", QuestionKind::LongText, "Describe a Rust project"),
                        "q1",
                        "Yes",
                    )),
                ],
            },
            Section {
                id: SectionId::from("s-2"),
                title: "Experience".to_string(),
                questions: vec![required(ranged(
                    question("q3", QuestionKind::Numeric, "Years of experience"),
                    0.0,
                    10.0,
                ))],
            },
        ],
    }
}

pub(super) fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
    pairs
        .iter()
        .map(|(id, value)| (QuestionId::from(*id), Answer::from(*value)))
        .collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessments {
    records: Arc<Mutex<HashMap<JobId, Assessment>>>,
    puts: Arc<Mutex<usize>>,
}

impl MemoryAssessments {
    pub(super) fn seeded(assessment: Assessment) -> Self {
        let repository = Self::default();
        repository
            .records
            .lock()
            .expect("repository mutex poisoned")
            .insert(assessment.job_id.clone(), assessment);
        repository
    }

    pub(super) fn put_count(&self) -> usize {
        *self.puts.lock().expect("repository mutex poisoned")
    }
}

impl AssessmentRepository for MemoryAssessments {
    fn fetch(&self, job_id: &JobId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(job_id).cloned())
    }

    fn put(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        *self.puts.lock().expect("repository mutex poisoned") += 1;
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(assessment.job_id.clone(), assessment.clone());
        Ok(assessment)
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingSink {
    pub(super) delivered: Arc<Mutex<Vec<Submission>>>,
}

impl RecordingSink {
    pub(super) fn deliveries(&self) -> Vec<Submission> {
        self.delivered
            .lock()
            .expect("sink mutex poisoned")
            .clone()
    }
}

impl SubmissionSink for RecordingSink {
    fn deliver(&self, submission: Submission) -> Result<(), SinkError> {
        self.delivered
            .lock()
            .expect("sink mutex poisoned")
            .push(submission);
        Ok(())
    }
}

pub(super) struct OfflineSink;

impl SubmissionSink for OfflineSink {
    fn deliver(&self, _submission: Submission) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("mail relay offline".to_string()))
    }
}

pub(super) type TestService = AssessmentService<MemoryAssessments, RecordingSink>;

pub(super) fn build_service() -> (TestService, Arc<MemoryAssessments>, Arc<RecordingSink>) {
    let repository = Arc::new(MemoryAssessments::seeded(Assessment {
        job_id: JobId::from("job-1"),
        structure: screening(),
    }));
    let sink = Arc::new(RecordingSink::default());
    let service = AssessmentService::new(repository.clone(), sink.clone());
    (service, repository, sink)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
