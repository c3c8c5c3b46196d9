use super::errors::AzureDevOpsError;
use super::models::{
    ListResponse, RepositoryInfo, SourceBranchPolicy, SourceCommentThread, SourcePullRequest,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const DEFAULT_SERVER_URL: &str = "https://dev.azure.com";
const API_VERSION: &str = "7.1";
const PULL_REQUEST_PAGE_SIZE: usize = 100;
const CONTINUATION_HEADER: &str = "x-ms-continuationtoken";

/// Status filter accepted by the pull request listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestStatusFilter {
    All,
    Active,
    Completed,
    Abandoned,
}

impl PullRequestStatusFilter {
    fn as_query(&self) -> &'static str {
        match self {
            PullRequestStatusFilter::All => "all",
            PullRequestStatusFilter::Active => "active",
            PullRequestStatusFilter::Completed => "completed",
            PullRequestStatusFilter::Abandoned => "abandoned",
        }
    }
}

/// Source platform operations used by the migration
///
/// Abstracted so the orchestrators can run against fakes in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AzureDevOpsOps: Send + Sync {
    /// Base URL of the organization, used to build browser links
    fn organization_url(&self, org: &str) -> String;

    async fn resolve_repository_id(
        &self,
        org: &str,
        project: &str,
        repo: &str,
    ) -> Result<String, AzureDevOpsError>;

    async fn list_branch_policies(
        &self,
        org: &str,
        project: &str,
        repo_id: &str,
    ) -> Result<Vec<SourceBranchPolicy>, AzureDevOpsError>;

    async fn list_pull_requests(
        &self,
        org: &str,
        project: &str,
        repo_id: &str,
        status: PullRequestStatusFilter,
    ) -> Result<Vec<SourcePullRequest>, AzureDevOpsError>;

    async fn list_pull_request_threads(
        &self,
        org: &str,
        project: &str,
        repo_id: &str,
        pull_request_id: i64,
    ) -> Result<Vec<SourceCommentThread>, AzureDevOpsError>;
}

/// Azure DevOps REST client authenticated with a personal access token
#[derive(Debug, Clone)]
pub struct AzureDevOpsClient {
    http: Client,
    server_url: String,
    token: String,
}

impl AzureDevOpsClient {
    pub fn new(server_url: &str, token: String) -> Result<Self, AzureDevOpsError> {
        let http = Client::builder()
            .user_agent(concat!("ado2gh/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn project_url(&self, org: &str, project: &str) -> String {
        format!("{}/{}/{}", self.server_url, org, project)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth("", Some(&self.token))
            .query(&[("api-version", API_VERSION)])
    }

    async fn check(response: Response, resource: &str) -> Result<Response, AzureDevOpsError> {
        let status = response.status();
        // 203 is the sign-in page served for a rejected token
        if status.is_success() && status.as_u16() != 203 {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AzureDevOpsError::from_status(status.as_u16(), resource, body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T, AzureDevOpsError> {
        let response = self.authorized(request).send().await?;
        let response = Self::check(response, resource).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AzureDevOpsOps for AzureDevOpsClient {
    fn organization_url(&self, org: &str) -> String {
        format!("{}/{}", self.server_url, org)
    }

    async fn resolve_repository_id(
        &self,
        org: &str,
        project: &str,
        repo: &str,
    ) -> Result<String, AzureDevOpsError> {
        let url = format!(
            "{}/_apis/git/repositories/{}",
            self.project_url(org, project),
            repo
        );
        debug!("Resolving Azure DevOps repository id: {url}");

        let info: RepositoryInfo = self
            .get_json(
                self.http.get(&url),
                &format!("repository '{org}/{project}/{repo}'"),
            )
            .await?;
        Ok(info.id)
    }

    async fn list_branch_policies(
        &self,
        org: &str,
        project: &str,
        repo_id: &str,
    ) -> Result<Vec<SourceBranchPolicy>, AzureDevOpsError> {
        let url = format!(
            "{}/_apis/git/policy/configurations",
            self.project_url(org, project)
        );
        let resource = format!("policy configurations of repository {repo_id}");

        let mut policies = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let mut request = self.http.get(&url).query(&[("repositoryId", repo_id)]);
            if let Some(token) = &continuation {
                request = request.query(&[("continuationToken", token.as_str())]);
            }

            let response = self.authorized(request).send().await?;
            let response = Self::check(response, &resource).await?;
            continuation = response
                .headers()
                .get(CONTINUATION_HEADER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            let page: ListResponse<SourceBranchPolicy> = response.json().await?;
            policies.extend(page.value);

            if continuation.is_none() {
                break;
            }
        }

        debug!("Fetched {} branch policies", policies.len());
        Ok(policies)
    }

    async fn list_pull_requests(
        &self,
        org: &str,
        project: &str,
        repo_id: &str,
        status: PullRequestStatusFilter,
    ) -> Result<Vec<SourcePullRequest>, AzureDevOpsError> {
        let url = format!(
            "{}/_apis/git/repositories/{}/pullrequests",
            self.project_url(org, project),
            repo_id
        );
        let resource = format!("pull requests of repository {repo_id}");

        let mut pull_requests = Vec::new();
        let mut skip = 0usize;
        loop {
            let request = self.http.get(&url).query(&[
                ("searchCriteria.status", status.as_query().to_string()),
                ("$top", PULL_REQUEST_PAGE_SIZE.to_string()),
                ("$skip", skip.to_string()),
            ]);
            let page: ListResponse<SourcePullRequest> = self.get_json(request, &resource).await?;
            let fetched = page.value.len();
            pull_requests.extend(page.value);

            if fetched < PULL_REQUEST_PAGE_SIZE {
                break;
            }
            skip += fetched;
        }

        debug!("Fetched {} pull requests", pull_requests.len());
        Ok(pull_requests)
    }

    async fn list_pull_request_threads(
        &self,
        org: &str,
        project: &str,
        repo_id: &str,
        pull_request_id: i64,
    ) -> Result<Vec<SourceCommentThread>, AzureDevOpsError> {
        let url = format!(
            "{}/_apis/git/repositories/{}/pullRequests/{}/threads",
            self.project_url(org, project),
            repo_id,
            pull_request_id
        );
        let page: ListResponse<SourceCommentThread> = self
            .get_json(
                self.http.get(&url),
                &format!("threads of pull request {pull_request_id}"),
            )
            .await?;
        Ok(page.value)
    }
}
