use super::domain::{Candidate, CandidateId, TimelineEvent};
pub use crate::repository::RepositoryError;

/// Storage abstraction for candidates and their activity history.
pub trait CandidateRepository: Send + Sync {
    fn insert(&self, candidate: Candidate) -> Result<Candidate, RepositoryError>;
    fn update(&self, candidate: Candidate) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    /// Every stored candidate in insertion order.
    fn all(&self) -> Result<Vec<Candidate>, RepositoryError>;
    fn append_event(&self, id: &CandidateId, event: TimelineEvent) -> Result<(), RepositoryError>;
    /// Events in the order they were appended.
    fn events(&self, id: &CandidateId) -> Result<Vec<TimelineEvent>, RepositoryError>;
}
