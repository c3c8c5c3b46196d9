use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::azure_devops::{AzureDevOpsClient, AzureDevOpsOps};
use crate::cli::{Commands, RepositoryArgs};
use crate::config::{MigrationConfig, ADO_TOKEN_ENV, GITHUB_TOKEN_ENV};
use crate::github::{GitHubClient, GitHubOps};
use crate::migration::PullRequestMigrationOptions;

pub mod branch_policies;
pub mod pull_requests;

pub use branch_policies::MigrateBranchPoliciesCommand;
pub use pull_requests::MigratePullRequestsCommand;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Clients for both platforms, built from flags and configuration
pub struct Platforms {
    pub source: Arc<dyn AzureDevOpsOps>,
    pub target: Arc<dyn GitHubOps>,
}

impl Platforms {
    pub fn connect(args: &RepositoryArgs, config: &MigrationConfig) -> Result<Self> {
        let ado_token = config
            .resolve_ado_token(args.ado_pat.as_deref())
            .ok_or_else(|| missing_token("Azure DevOps", ADO_TOKEN_ENV, "--ado-pat"))?;
        let github_token = config
            .resolve_github_token(args.github_pat.as_deref())
            .ok_or_else(|| missing_token("GitHub", GITHUB_TOKEN_ENV, "--github-pat"))?;

        let server_url = args
            .ado_server_url
            .as_deref()
            .unwrap_or(&config.azure_devops.server_url);
        let api_url = args
            .target_api_url
            .as_deref()
            .or(config.github.api_url.as_deref());

        tracing::debug!(server_url, ?api_url, "connecting to Azure DevOps and GitHub");

        Ok(Self {
            source: Arc::new(AzureDevOpsClient::new(server_url, ado_token)?),
            target: Arc::new(GitHubClient::new(github_token, api_url)?),
        })
    }
}

fn missing_token(platform: &str, env_var: &str, flag: &str) -> anyhow::Error {
    anyhow!(
        "No {platform} token found.\n   → Set the {env_var} environment variable (a .env file works too)\n   → Or pass {flag} <TOKEN>"
    )
}

/// Build the command object for a parsed subcommand
pub fn build(command: Commands, config: MigrationConfig) -> AnyCommand {
    match command {
        Commands::MigrateBranchPolicies { repo } => {
            AnyCommand::BranchPolicies(MigrateBranchPoliciesCommand::new(repo, config))
        }
        Commands::MigratePullRequests {
            repo,
            include_abandoned,
            include_completed,
            include_active,
            skip_comments,
            labels,
        } => AnyCommand::PullRequests(MigratePullRequestsCommand::new(
            repo,
            config,
            PullRequestMigrationOptions {
                include_abandoned,
                include_completed,
                include_active,
                migrate_comments: !skip_comments,
                labels,
            },
        )),
    }
}

pub enum AnyCommand {
    BranchPolicies(MigrateBranchPoliciesCommand),
    PullRequests(MigratePullRequestsCommand),
}

impl Command for AnyCommand {
    async fn execute(&self) -> Result<()> {
        match self {
            AnyCommand::BranchPolicies(command) => command.execute().await,
            AnyCommand::PullRequests(command) => command.execute().await,
        }
    }
}
