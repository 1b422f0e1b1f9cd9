//! Candidate pipeline: stage buckets, stage transitions, profiles, and timelines.

pub mod domain;
pub mod pipeline;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Candidate, CandidateId, CandidateProfile, InvalidStage, NewCandidate, Stage, TimelineEvent,
};
pub use pipeline::{group_by_stage, Pipeline, StageColumn, StageMove};
pub use repository::CandidateRepository;
pub use router::candidate_router;
pub use service::{CandidateService, CandidateServiceError};
