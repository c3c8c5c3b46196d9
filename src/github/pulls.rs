use super::errors::GitHubError;
use super::types::CreatedPullRequest;
use octocrab::params::pulls::State;
use octocrab::Octocrab;
use tracing::debug;

/// Handler for GitHub pull request operations
#[derive(Debug, Clone)]
pub struct PullRequestHandler {
    octocrab: Octocrab,
}

impl PullRequestHandler {
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    /// Create a new pull request
    pub async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        head_branch: &str,
        base_branch: &str,
    ) -> Result<CreatedPullRequest, GitHubError> {
        let pr = self
            .octocrab
            .pulls(owner, repo)
            .create(title, head_branch, base_branch)
            .body(body)
            .send()
            .await?;

        debug!("Created PR #{} ({head_branch} -> {base_branch})", pr.number);
        Ok(CreatedPullRequest {
            number: pr.number,
            html_url: pr.html_url.map(|url| url.to_string()),
        })
    }

    /// Close a pull request without merging
    pub async fn close_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<(), GitHubError> {
        self.octocrab
            .pulls(owner, repo)
            .update(pr_number)
            .state(State::Closed)
            .send()
            .await?;

        debug!("Closed PR #{pr_number}");
        Ok(())
    }

    /// Add labels to a pull request (labels live on the backing issue)
    pub async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError> {
        self.octocrab
            .issues(owner, repo)
            .add_labels(pr_number, labels)
            .await?;
        Ok(())
    }

    /// Create a conversation comment on a pull request
    pub async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        // PR comments use the same API as issue comments
        self.octocrab
            .issues(owner, repo)
            .create_comment(pr_number, body)
            .await?;
        Ok(())
    }
}
