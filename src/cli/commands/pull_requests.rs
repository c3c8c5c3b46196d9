use anyhow::Result;
use tracing::Instrument;

use super::{Command, Platforms};
use crate::cli::RepositoryArgs;
use crate::config::MigrationConfig;
use crate::logging::ConsoleLogger;
use crate::migration::{PullRequestMigrationOptions, PullRequestOrchestrator};
use crate::telemetry::{create_migration_span, generate_correlation_id};

pub struct MigratePullRequestsCommand {
    repo: RepositoryArgs,
    config: MigrationConfig,
    options: PullRequestMigrationOptions,
}

impl MigratePullRequestsCommand {
    pub fn new(
        repo: RepositoryArgs,
        config: MigrationConfig,
        options: PullRequestMigrationOptions,
    ) -> Self {
        Self {
            repo,
            config,
            options,
        }
    }

    pub fn options(&self) -> &PullRequestMigrationOptions {
        &self.options
    }
}

impl Command for MigratePullRequestsCommand {
    async fn execute(&self) -> Result<()> {
        let repos = self.repo.repository_pair();
        let correlation_id = generate_correlation_id();
        let span = create_migration_span(
            "migrate-pull-requests",
            &repos.source_label(),
            &repos.target_label(),
            &correlation_id,
        );

        async {
            let platforms = Platforms::connect(&self.repo, &self.config)?;
            let logger = ConsoleLogger::shared(self.repo.verbose);

            if !self.options.include_abandoned
                && !self.options.include_completed
                && !self.options.include_active
            {
                logger.warning("Every pull request status is excluded; nothing will be migrated");
            }

            let orchestrator =
                PullRequestOrchestrator::new(platforms.source, platforms.target, logger);
            let outcome = orchestrator.migrate(&repos, &self.options).await?;
            tracing::info!(
                succeeded = outcome.succeeded,
                skipped = outcome.skipped,
                "pull request migration finished"
            );
            Ok::<(), anyhow::Error>(())
        }
        .instrument(span)
        .await
    }
}
