// ado2gh library - finishes an Azure DevOps to GitHub repository migration
// This exposes the core components for testing and integration

pub mod azure_devops;
pub mod cli;
pub mod config;
pub mod errors;
pub mod github;
pub mod logging;
pub mod migration;
pub mod telemetry;

// Re-export key types for easy access
pub use azure_devops::{AzureDevOpsClient, AzureDevOpsError, AzureDevOpsOps};
pub use config::MigrationConfig;
pub use errors::FailureKind;
pub use github::{BranchProtection, GitHubClient, GitHubError, GitHubOps};
pub use logging::{ConsoleLogger, MigrationLogger};
pub use migration::{
    BranchPolicyOrchestrator, BranchPolicyTransformer, Fidelity, ItemOutcome, ItemStatus,
    MigrationError, MigrationOutcome, PullRequestMigrationOptions, PullRequestOrchestrator,
    RepositoryPair, RunVerdict,
};
pub use telemetry::{create_migration_span, generate_correlation_id, init_telemetry};
