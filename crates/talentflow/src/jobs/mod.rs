//! Job postings: the ordered board, listing, creation, and updates.

pub mod domain;
pub mod ordering;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    slugify, Job, JobId, JobPage, JobPatch, JobQuery, JobStatus, NewJob, StatusFilter, Viewer,
};
pub use ordering::JobBoard;
pub use repository::JobRepository;
pub use router::job_router;
pub use service::{JobService, JobServiceError};
