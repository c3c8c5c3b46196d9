use clap::{ArgAction, Args, Parser, Subcommand};

use crate::migration::RepositoryPair;

pub mod commands;

#[derive(Parser)]
#[command(name = "ado2gh")]
#[command(version)]
#[command(about = "Finish an Azure DevOps to GitHub repository migration")]
#[command(long_about = "ado2gh completes a repository migration from Azure DevOps to GitHub: it \
                       translates branch policies into GitHub branch protection and recreates pull \
                       requests, with their comments, that the repository import left behind. \
                       Tokens are read from ADO_PAT and GH_PAT unless given as flags.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate Azure DevOps branch policies into GitHub branch protection
    MigrateBranchPolicies {
        #[command(flatten)]
        repo: RepositoryArgs,
    },
    /// Recreate Azure DevOps pull requests and their comments on GitHub
    MigratePullRequests {
        #[command(flatten)]
        repo: RepositoryArgs,
        /// Recreate abandoned pull requests
        #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
        include_abandoned: bool,
        /// Recreate completed pull requests
        #[arg(long)]
        include_completed: bool,
        /// Recreate active pull requests
        #[arg(long)]
        include_active: bool,
        /// Do not copy pull request comments
        #[arg(long)]
        skip_comments: bool,
        /// Label added to every recreated pull request (repeatable)
        #[arg(long = "label", value_name = "LABEL")]
        labels: Vec<String>,
    },
}

/// Source and target repository coordinates shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct RepositoryArgs {
    /// Azure DevOps organization
    #[arg(long)]
    pub ado_org: String,
    /// Azure DevOps team project
    #[arg(long)]
    pub ado_team_project: String,
    /// Azure DevOps repository
    #[arg(long)]
    pub ado_repo: String,
    /// GitHub organization (or user) owning the migrated repository
    #[arg(long)]
    pub github_org: String,
    /// Migrated GitHub repository
    #[arg(long)]
    pub github_repo: String,
    /// Azure DevOps personal access token, overrides ADO_PAT
    #[arg(long)]
    pub ado_pat: Option<String>,
    /// GitHub personal access token, overrides GH_PAT
    #[arg(long)]
    pub github_pat: Option<String>,
    /// GitHub API base URL, for GitHub Enterprise Server
    #[arg(long, value_name = "URL")]
    pub target_api_url: Option<String>,
    /// Azure DevOps server URL, for Azure DevOps Server installations
    #[arg(long, value_name = "URL")]
    pub ado_server_url: Option<String>,
    /// Show detailed progress and diagnostics
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl RepositoryArgs {
    pub fn repository_pair(&self) -> RepositoryPair {
        RepositoryPair {
            ado_org: self.ado_org.clone(),
            ado_project: self.ado_team_project.clone(),
            ado_repo: self.ado_repo.clone(),
            github_org: self.github_org.clone(),
            github_repo: self.github_repo.clone(),
        }
    }
}

impl Commands {
    pub fn repository_args(&self) -> &RepositoryArgs {
        match self {
            Commands::MigrateBranchPolicies { repo } => repo,
            Commands::MigratePullRequests { repo, .. } => repo,
        }
    }
}
