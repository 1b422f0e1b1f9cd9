use super::domain::{Job, JobId};
pub use crate::repository::RepositoryError;

/// Storage abstraction for job postings so the service can be exercised in isolation.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update(&self, job: Job) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    /// Every stored job, ascending by position.
    fn ordered(&self) -> Result<Vec<Job>, RepositoryError>;
    /// Rewrites stored positions in one step.
    fn write_positions(&self, positions: &[(JobId, u32)]) -> Result<(), RepositoryError>;
}
