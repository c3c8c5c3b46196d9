use super::outcome::{MigrationOutcome, RunVerdict};
use crate::azure_devops::AzureDevOpsError;
use crate::errors::FailureKind;
use crate::github::GitHubError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Source(#[from] AzureDevOpsError),
    #[error(transparent)]
    Target(#[from] GitHubError),
    #[error("{} of {} items failed to migrate", .outcome.failed, .outcome.total())]
    Incomplete { outcome: MigrationOutcome },
}

impl MigrationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            MigrationError::Source(err) => err.kind(),
            MigrationError::Target(err) => err.kind(),
            MigrationError::Incomplete { .. } => FailureKind::Unexpected,
        }
    }

    /// Diagnostic detail worth showing only at verbose level
    pub fn detail(&self) -> String {
        match self {
            MigrationError::Target(err) => err
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{err:?}")),
            other => format!("{other:?}"),
        }
    }

    pub fn outcome(&self) -> Option<&MigrationOutcome> {
        match self {
            MigrationError::Incomplete { outcome } => Some(outcome),
            _ => None,
        }
    }
}

impl MigrationOutcome {
    /// Turn the run record into the run result: any failed item fails the run
    pub fn into_result(self) -> Result<MigrationOutcome, MigrationError> {
        match self.verdict() {
            RunVerdict::Failed | RunVerdict::PartialFailure => {
                Err(MigrationError::Incomplete { outcome: self })
            }
            RunVerdict::Completed | RunVerdict::NothingMigrated => Ok(self),
        }
    }
}

/// Remediation lines printed after a failure of the given kind
pub fn guidance(kind: FailureKind) -> &'static [&'static str] {
    match kind {
        FailureKind::PlanLimitation => &[
            "The GitHub plan of the target organization does not include this feature.",
            "→ Branch protection on private repositories requires GitHub Team, Enterprise, or a public repository",
            "→ Upgrade the organization plan, or configure the remaining rules manually in Settings → Branches",
        ],
        FailureKind::PermissionDenied => &[
            "→ The token needs the 'repo' scope (and repository admin rights for branch protection)",
            "→ The Azure DevOps token needs 'Code (Read)' scope",
            "→ Create or edit tokens at https://github.com/settings/tokens",
        ],
        FailureKind::NotFound => &[
            "→ Check that the repository and branch exist on the target and that the migration finished",
        ],
        FailureKind::InvalidConfiguration => &[
            "→ GitHub rejected the protection settings; review the branch's source policies",
        ],
        FailureKind::MissingBranches => &[
            "→ Push the pull request's source and target branches to GitHub before migrating it",
        ],
        FailureKind::RateLimited => &[
            "→ Rate limit reached; wait for the limit to reset and run the command again",
        ],
        FailureKind::Network => &[
            "→ Check network connectivity and proxy settings, then run the command again",
        ],
        FailureKind::Unexpected => &["→ Re-run with --verbose for full diagnostic detail"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::outcome::ItemOutcome;

    #[test]
    fn test_into_result_fails_on_any_error() {
        let outcome: MigrationOutcome = vec![
            ItemOutcome::succeeded("main"),
            ItemOutcome::failed("dev", FailureKind::Network, "down"),
        ]
        .into_iter()
        .collect();

        let err = outcome.into_result().unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 items failed to migrate");
        assert_eq!(err.outcome().unwrap().succeeded, 1);
    }

    #[test]
    fn test_into_result_ok_when_only_skips() {
        let outcome: MigrationOutcome =
            vec![ItemOutcome::skipped("dev", "missing")].into_iter().collect();
        assert!(outcome.into_result().is_ok());
    }

    #[test]
    fn test_kind_passes_through_target_errors() {
        let err = MigrationError::from(GitHubError::NotFound {
            message: "Branch not found".to_string(),
        });
        assert_eq!(err.kind(), FailureKind::NotFound);
    }
}
