//! Applicant tracking core: job ordering, the candidate stage pipeline, and
//! assessment forms with conditional questions.

pub mod assessments;
pub mod candidates;
pub mod config;
pub mod error;
pub mod jobs;
pub mod repository;
pub mod telemetry;
