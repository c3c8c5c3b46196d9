//! Per-run outcome record
//!
//! Orchestrators collect one [`ItemOutcome`] per branch or pull request and
//! fold them into a [`MigrationOutcome`]. The summary and the final exit
//! decision are computed from that record alone.

use crate::errors::FailureKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    Succeeded { note: Option<String> },
    Skipped { reason: String },
    Failed { kind: FailureKind, message: String },
}

/// Result of processing one branch or pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub item: String,
    pub status: ItemStatus,
}

impl ItemOutcome {
    pub fn succeeded(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            status: ItemStatus::Succeeded { note: None },
        }
    }

    pub fn succeeded_with_note(item: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            status: ItemStatus::Succeeded {
                note: Some(note.into()),
            },
        }
    }

    pub fn skipped(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            status: ItemStatus::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn failed(item: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            status: ItemStatus::Failed {
                kind,
                message: message.into(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, ItemStatus::Failed { .. })
    }
}

/// How a run ended, derived from its outcome counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunVerdict {
    /// Every attempted item succeeded or was skipped, at least one succeeded
    Completed,
    /// No errors, but nothing was migrated either
    NothingMigrated,
    /// Some items succeeded, some failed
    PartialFailure,
    /// Items were attempted and none succeeded
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub details: Vec<ItemOutcome>,
}

impl FromIterator<ItemOutcome> for MigrationOutcome {
    fn from_iter<I: IntoIterator<Item = ItemOutcome>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MigrationOutcome::default(), |mut outcome, item| {
                match item.status {
                    ItemStatus::Succeeded { .. } => outcome.succeeded += 1,
                    ItemStatus::Skipped { .. } => outcome.skipped += 1,
                    ItemStatus::Failed { .. } => outcome.failed += 1,
                }
                outcome.details.push(item);
                outcome
            })
    }
}

impl MigrationOutcome {
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    pub fn verdict(&self) -> RunVerdict {
        match (self.succeeded, self.failed) {
            (0, 0) => RunVerdict::NothingMigrated,
            (_, 0) => RunVerdict::Completed,
            (0, _) => RunVerdict::Failed,
            _ => RunVerdict::PartialFailure,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.details.iter().filter(|item| item.is_failure())
    }

    /// Count failures of one kind
    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures()
            .filter(|item| matches!(&item.status, ItemStatus::Failed { kind: k, .. } if *k == kind))
            .count()
    }
}
