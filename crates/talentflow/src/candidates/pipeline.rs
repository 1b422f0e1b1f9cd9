use std::fmt::Display;

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{Candidate, CandidateId, InvalidStage, Stage};

/// One kanban column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageColumn {
    pub stage: Stage,
    pub label: &'static str,
    pub candidates: Vec<Candidate>,
}

/// Stable partition into one column per stage, in [`Stage::ALL`] order.
/// Every column is present even when empty.
pub fn group_by_stage<'a, I>(candidates: I) -> Vec<StageColumn>
where
    I: IntoIterator<Item = &'a Candidate>,
{
    let mut columns: Vec<StageColumn> = Stage::ALL
        .into_iter()
        .map(|stage| StageColumn {
            stage,
            label: stage.label(),
            candidates: Vec::new(),
        })
        .collect();

    for candidate in candidates {
        columns[candidate.stage.index()]
            .candidates
            .push(candidate.clone());
    }

    columns
}

/// A stage transition that was applied locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMove {
    pub candidate_id: CandidateId,
    pub from: Stage,
    pub to: Stage,
}

/// In-memory candidate board backing the kanban view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    candidates: Vec<Candidate>,
}

impl Pipeline {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn get(&self, id: &CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|candidate| &candidate.id == id)
    }

    pub fn columns(&self) -> Vec<StageColumn> {
        group_by_stage(&self.candidates)
    }

    /// Validates `stage` and moves the candidate there. An unrecognized stage
    /// fails and leaves the board untouched; an unknown candidate is a no-op.
    pub fn move_stage(
        &mut self,
        id: &CandidateId,
        stage: &str,
    ) -> Result<Option<StageMove>, InvalidStage> {
        let to: Stage = stage.parse()?;

        let Some(candidate) = self.candidates.iter_mut().find(|c| &c.id == id) else {
            debug!(candidate_id = %id, "stage move ignored: candidate not on the board");
            return Ok(None);
        };

        let from = candidate.stage;
        candidate.stage = to;
        Ok(Some(StageMove {
            candidate_id: id.clone(),
            from,
            to,
        }))
    }

    /// Optimistic move: the board changes immediately, then `sync` receives
    /// the candidate and target stage. A failed sync is logged, not rolled back.
    pub fn move_and_sync<F, E>(
        &mut self,
        id: &CandidateId,
        stage: &str,
        sync: F,
    ) -> Result<Option<StageMove>, InvalidStage>
    where
        F: FnOnce(&CandidateId, Stage) -> Result<(), E>,
        E: Display,
    {
        let applied = self.move_stage(id, stage)?;

        if let Some(change) = &applied {
            if let Err(err) = sync(&change.candidate_id, change.to) {
                warn!(
                    candidate_id = %change.candidate_id,
                    stage = %change.to,
                    error = %err,
                    "durable stage update failed; board keeps optimistic stage"
                );
            }
        }

        Ok(applied)
    }
}
