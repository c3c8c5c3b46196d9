//! Migration engine: policy and pull request transformation plus the
//! per-item orchestration that applies the results to GitHub.

pub mod branch_policy;
pub mod errors;
pub mod outcome;
pub mod pull_request;
mod report;

pub use branch_policy::{BranchPolicyOrchestrator, BranchPolicyTransformer, Fidelity};
pub use errors::MigrationError;
pub use outcome::{ItemOutcome, ItemStatus, MigrationOutcome, RunVerdict};
pub use pull_request::{PullRequestMigrationOptions, PullRequestOrchestrator};

/// Source repository on Azure DevOps and its migrated counterpart on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPair {
    pub ado_org: String,
    pub ado_project: String,
    pub ado_repo: String,
    pub github_org: String,
    pub github_repo: String,
}

impl RepositoryPair {
    pub fn source_label(&self) -> String {
        format!("{}/{}/{}", self.ado_org, self.ado_project, self.ado_repo)
    }

    pub fn target_label(&self) -> String {
        format!("{}/{}", self.github_org, self.github_repo)
    }
}
