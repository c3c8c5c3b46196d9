use anyhow::Result;
use tracing::Instrument;

use super::{Command, Platforms};
use crate::cli::RepositoryArgs;
use crate::config::MigrationConfig;
use crate::logging::ConsoleLogger;
use crate::migration::BranchPolicyOrchestrator;
use crate::telemetry::{create_migration_span, generate_correlation_id};

pub struct MigrateBranchPoliciesCommand {
    repo: RepositoryArgs,
    config: MigrationConfig,
}

impl MigrateBranchPoliciesCommand {
    pub fn new(repo: RepositoryArgs, config: MigrationConfig) -> Self {
        Self { repo, config }
    }
}

impl Command for MigrateBranchPoliciesCommand {
    async fn execute(&self) -> Result<()> {
        let repos = self.repo.repository_pair();
        let correlation_id = generate_correlation_id();
        let span = create_migration_span(
            "migrate-branch-policies",
            &repos.source_label(),
            &repos.target_label(),
            &correlation_id,
        );

        async {
            let platforms = Platforms::connect(&self.repo, &self.config)?;
            let orchestrator = BranchPolicyOrchestrator::new(
                platforms.source,
                platforms.target,
                ConsoleLogger::shared(self.repo.verbose),
                self.config.review_limits,
            );

            let outcome = orchestrator.migrate(&repos).await?;
            tracing::info!(
                succeeded = outcome.succeeded,
                skipped = outcome.skipped,
                "branch policy migration finished"
            );
            Ok::<(), anyhow::Error>(())
        }
        .instrument(span)
        .await
    }
}
