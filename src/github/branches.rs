use super::errors::GitHubError;
use super::types::{BranchProtection, UpdateBranchProtectionRequest};
use octocrab::Octocrab;
use tracing::debug;

/// Handler for GitHub branch and branch protection operations
#[derive(Debug, Clone)]
pub struct BranchHandler {
    octocrab: Octocrab,
}

impl BranchHandler {
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    fn protection_route(owner: &str, repo: &str, branch: &str) -> String {
        let branch = encode_branch(branch);
        format!("/repos/{owner}/{repo}/branches/{branch}/protection")
    }

    fn ref_route(owner: &str, repo: &str, branch: &str) -> String {
        let branch = encode_branch(branch);
        format!("/repos/{owner}/{repo}/git/ref/heads/{branch}")
    }

    /// Check if a branch exists
    pub async fn branch_exists(
        &self,
        owner: &str,
        repo: &str,
        branch_name: &str,
    ) -> Result<bool, GitHubError> {
        let route = Self::ref_route(owner, repo, branch_name);
        match self
            .octocrab
            .get::<serde_json::Value, _, ()>(&route, None)
            .await
        {
            Ok(_) => Ok(true),
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch the current protection of a branch, `None` when unprotected
    pub async fn get_protection(
        &self,
        owner: &str,
        repo: &str,
        branch_name: &str,
    ) -> Result<Option<serde_json::Value>, GitHubError> {
        let route = Self::protection_route(owner, repo, branch_name);
        match self
            .octocrab
            .get::<serde_json::Value, _, ()>(&route, None)
            .await
        {
            Ok(protection) => Ok(Some(protection)),
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create or replace the protection of a branch
    pub async fn update_protection(
        &self,
        owner: &str,
        repo: &str,
        branch_name: &str,
        protection: &BranchProtection,
    ) -> Result<(), GitHubError> {
        let route = Self::protection_route(owner, repo, branch_name);
        let body = UpdateBranchProtectionRequest::from(protection);
        debug!("PUT {route}: {}", serde_json::to_string(&body).unwrap_or_default());

        let _: serde_json::Value = self.octocrab.put(&route, Some(&body)).await?;
        Ok(())
    }
}

/// Percent-encode each `/`-separated segment so characters such as `#` and
/// `?` stay part of the branch name
fn encode_branch(branch: &str) -> String {
    branch
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
