use super::branches::BranchHandler;
use super::errors::GitHubError;
use super::pulls::PullRequestHandler;
use super::types::{BranchProtection, CreatedPullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;

/// Trait for GitHub operations to enable testing with mocks
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubOps: Send + Sync {
    async fn branch_exists(&self, owner: &str, repo: &str, branch: &str)
        -> Result<bool, GitHubError>;

    async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<serde_json::Value>, GitHubError>;

    async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        protection: &BranchProtection,
    ) -> Result<(), GitHubError>;

    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<CreatedPullRequest, GitHubError>;

    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError>;

    async fn create_pull_request_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<(), GitHubError>;

    async fn close_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<(), GitHubError>;
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    branches: BranchHandler,
    pulls: PullRequestHandler,
}

impl GitHubClient {
    /// Build a client for github.com, or for a GitHub Enterprise Server API
    /// when `api_url` is given
    pub fn new(token: String, api_url: Option<&str>) -> Result<Self, GitHubError> {
        let mut builder = Octocrab::builder().personal_token(token);
        if let Some(url) = api_url {
            builder = builder.base_uri(url)?;
        }
        let octocrab = builder.build()?;

        Ok(Self::from_octocrab(octocrab))
    }

    pub fn from_octocrab(octocrab: Octocrab) -> Self {
        Self {
            branches: BranchHandler::new(octocrab.clone()),
            pulls: PullRequestHandler::new(octocrab),
        }
    }
}

#[async_trait]
impl GitHubOps for GitHubClient {
    async fn branch_exists(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<bool, GitHubError> {
        self.branches.branch_exists(owner, repo, branch).await
    }

    async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<serde_json::Value>, GitHubError> {
        self.branches.get_protection(owner, repo, branch).await
    }

    async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        protection: &BranchProtection,
    ) -> Result<(), GitHubError> {
        self.branches
            .update_protection(owner, repo, branch, protection)
            .await
    }

    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<CreatedPullRequest, GitHubError> {
        self.pulls
            .create_pull_request(owner, repo, title, body, head, base)
            .await
    }

    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError> {
        self.pulls.add_labels(owner, repo, pr_number, labels).await
    }

    async fn create_pull_request_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        self.pulls
            .create_comment(owner, repo, pr_number, body)
            .await
    }

    async fn close_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<(), GitHubError> {
        self.pulls.close_pull_request(owner, repo, pr_number).await
    }
}
