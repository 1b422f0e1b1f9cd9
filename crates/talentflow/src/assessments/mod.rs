//! Assessment forms: the section/question schema, draft editing, the
//! visibility and validation pass, previews, and submission.

pub mod builder;
pub mod preview;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;
pub mod submission;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use builder::QuestionEdit;
pub use preview::{preview, Preview, PreviewItem, PreviewSection};
pub use repository::AssessmentRepository;
pub use router::assessment_router;
pub use schema::{
    Assessment, AssessmentStructure, Conditional, Question, QuestionId, QuestionKind,
    SchemaError, Section, SectionId, Validation,
};
pub use service::{AssessmentService, AssessmentServiceError};
pub use submission::{
    submit, SinkError, Submission, SubmissionError, SubmissionReceipt, SubmissionSink,
};
pub use visibility::{
    evaluate, failures, is_visible, validate, visible_questions, Answer, AnswerSet,
    FailureReason, QuestionFailure, QuestionOutcome, ValidationResult,
};
