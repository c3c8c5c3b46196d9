//! Hand-written fake platforms for orchestrator integration tests
//!
//! The fakes keep their data in memory and record every mutating call so
//! tests can assert on exactly what would have been sent to GitHub.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Mutex;

use ado2gh::azure_devops::models::{
    IdentityRef, PolicyKind, PolicyScope, PolicySettings, ProjectRef, RepositoryRef,
};
use ado2gh::azure_devops::{
    AzureDevOpsError, AzureDevOpsOps, PullRequestStatus, PullRequestStatusFilter,
    SourceBranchPolicy, SourceComment, SourceCommentThread, SourcePullRequest,
};
use ado2gh::github::{BranchProtection, CreatedPullRequest, GitHubError, GitHubOps};
use ado2gh::RepositoryPair;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

pub fn repos() -> RepositoryPair {
    RepositoryPair {
        ado_org: "contoso".to_string(),
        ado_project: "web".to_string(),
        ado_repo: "app".to_string(),
        github_org: "contoso-gh".to_string(),
        github_repo: "app".to_string(),
    }
}

pub fn scoped(ref_name: &str) -> Vec<PolicyScope> {
    vec![PolicyScope {
        ref_name: Some(ref_name.to_string()),
        match_kind: Some("Exact".to_string()),
        repository_id: Some("repo-id".to_string()),
    }]
}

pub fn reviewer_policy(id: i64, branch: &str, approvers: u32) -> SourceBranchPolicy {
    SourceBranchPolicy {
        id,
        kind: PolicyKind::MinimumReviewers,
        is_enabled: true,
        is_blocking: true,
        settings: PolicySettings {
            minimum_approver_count: Some(approvers),
            scope: scoped(&format!("refs/heads/{branch}")),
            ..Default::default()
        },
    }
}

pub fn build_policy(id: i64, branch: &str, name: &str) -> SourceBranchPolicy {
    SourceBranchPolicy {
        id,
        kind: PolicyKind::BuildValidation,
        is_enabled: true,
        is_blocking: true,
        settings: PolicySettings {
            display_name: Some(name.to_string()),
            scope: scoped(&format!("refs/heads/{branch}")),
            ..Default::default()
        },
    }
}

pub fn pull_request(id: i64, status: PullRequestStatus, head: &str, base: &str) -> SourcePullRequest {
    SourcePullRequest {
        id,
        title: format!("Change {id}"),
        description: Some(format!("Description of change {id}")),
        status,
        created_by: Some(IdentityRef {
            display_name: Some("Dana Smith".to_string()),
            unique_name: Some("dana@contoso.com".to_string()),
        }),
        creation_date: Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()),
        closed_date: None,
        source_ref_name: Some(format!("refs/heads/{head}")),
        target_ref_name: Some(format!("refs/heads/{base}")),
        url: Some(format!(
            "https://dev.azure.com/contoso/_apis/git/repositories/repo-id/pullRequests/{id}"
        )),
        repository: Some(RepositoryRef {
            name: Some("app".to_string()),
            project: Some(ProjectRef {
                name: Some("web".to_string()),
            }),
        }),
    }
}

pub fn comment(id: i64, content: Option<&str>) -> SourceComment {
    SourceComment {
        id,
        content: content.map(str::to_string),
        author: Some(IdentityRef {
            display_name: Some("Lee".to_string()),
            unique_name: None,
        }),
        published_date: Some(Utc.with_ymd_and_hms(2024, 1, 16, 8, 30, 0).unwrap()),
        comment_type: Some("text".to_string()),
    }
}

pub fn system_comment(id: i64, content: &str) -> SourceComment {
    SourceComment {
        comment_type: Some("system".to_string()),
        ..comment(id, Some(content))
    }
}

#[derive(Default)]
pub struct FakeAzureDevOps {
    pub policies: Vec<SourceBranchPolicy>,
    pub pull_requests: Vec<SourcePullRequest>,
    pub threads: HashMap<i64, Vec<SourceCommentThread>>,
    pub failing_threads: BTreeSet<i64>,
}

impl FakeAzureDevOps {
    pub fn with_policies(policies: Vec<SourceBranchPolicy>) -> Self {
        Self {
            policies,
            ..Default::default()
        }
    }

    pub fn with_pull_requests(pull_requests: Vec<SourcePullRequest>) -> Self {
        Self {
            pull_requests,
            ..Default::default()
        }
    }
}

#[async_trait]
impl AzureDevOpsOps for FakeAzureDevOps {
    fn organization_url(&self, org: &str) -> String {
        format!("https://dev.azure.com/{org}")
    }

    async fn resolve_repository_id(
        &self,
        _org: &str,
        _project: &str,
        _repo: &str,
    ) -> Result<String, AzureDevOpsError> {
        Ok("repo-id".to_string())
    }

    async fn list_branch_policies(
        &self,
        _org: &str,
        _project: &str,
        _repo_id: &str,
    ) -> Result<Vec<SourceBranchPolicy>, AzureDevOpsError> {
        Ok(self.policies.clone())
    }

    async fn list_pull_requests(
        &self,
        _org: &str,
        _project: &str,
        _repo_id: &str,
        _status: PullRequestStatusFilter,
    ) -> Result<Vec<SourcePullRequest>, AzureDevOpsError> {
        Ok(self.pull_requests.clone())
    }

    async fn list_pull_request_threads(
        &self,
        _org: &str,
        _project: &str,
        _repo_id: &str,
        pull_request_id: i64,
    ) -> Result<Vec<SourceCommentThread>, AzureDevOpsError> {
        if self.failing_threads.contains(&pull_request_id) {
            return Err(AzureDevOpsError::Http {
                status: 500,
                message: "thread service unavailable".to_string(),
            });
        }
        Ok(self
            .threads
            .get(&pull_request_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// A call that changed state on the fake GitHub
#[derive(Debug, Clone, PartialEq)]
pub enum GitHubCall {
    UpdateProtection {
        branch: String,
        protection: BranchProtection,
    },
    CreatePullRequest {
        number: u64,
        title: String,
        body: String,
        head: String,
        base: String,
    },
    AddLabels {
        number: u64,
        labels: Vec<String>,
    },
    Comment {
        number: u64,
        body: String,
    },
    Close {
        number: u64,
    },
}

/// In-memory GitHub with scripted failures
#[derive(Default)]
pub struct FakeGitHub {
    pub branches: BTreeSet<String>,
    /// Errors returned, in order, by protection updates of a branch
    pub protection_failures: Mutex<HashMap<String, VecDeque<GitHubError>>>,
    /// Comments whose body contains any of these are refused
    pub failing_comments: Vec<String>,
    pub failing_labels: bool,
    pub calls: Mutex<Vec<GitHubCall>>,
    pub next_number: Mutex<u64>,
}

impl FakeGitHub {
    pub fn with_branches(branches: &[&str]) -> Self {
        Self {
            branches: branches.iter().map(|branch| branch.to_string()).collect(),
            next_number: Mutex::new(100),
            ..Default::default()
        }
    }

    pub fn fail_protection(&self, branch: &str, errors: Vec<GitHubError>) {
        self.protection_failures
            .lock()
            .unwrap()
            .insert(branch.to_string(), errors.into_iter().collect());
    }

    pub fn calls(&self) -> Vec<GitHubCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn protection_updates(&self) -> Vec<(String, BranchProtection)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GitHubCall::UpdateProtection { branch, protection } => Some((branch, protection)),
                _ => None,
            })
            .collect()
    }

    pub fn created_pull_requests(&self) -> Vec<GitHubCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, GitHubCall::CreatePullRequest { .. }))
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&GitHubCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: GitHubCall) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn plan_limitation() -> GitHubError {
    GitHubError::PlanLimitation {
        message: "Upgrade to GitHub Pro or make this repository public to enable this feature."
            .to_string(),
    }
}

pub fn invalid_configuration() -> GitHubError {
    GitHubError::InvalidConfiguration {
        message: "Validation Failed".to_string(),
    }
}

#[async_trait]
impl GitHubOps for FakeGitHub {
    async fn branch_exists(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
    ) -> Result<bool, GitHubError> {
        Ok(self.branches.contains(branch))
    }

    async fn get_branch_protection(
        &self,
        _owner: &str,
        _repo: &str,
        _branch: &str,
    ) -> Result<Option<serde_json::Value>, GitHubError> {
        Ok(None)
    }

    async fn update_branch_protection(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
        protection: &BranchProtection,
    ) -> Result<(), GitHubError> {
        self.record(GitHubCall::UpdateProtection {
            branch: branch.to_string(),
            protection: protection.clone(),
        });
        let scripted = self
            .protection_failures
            .lock()
            .unwrap()
            .get_mut(branch)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn create_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<CreatedPullRequest, GitHubError> {
        if !self.branches.contains(head) || !self.branches.contains(base) {
            return Err(GitHubError::MissingBranches {
                message: "Validation Failed".to_string(),
            });
        }
        let number = {
            let mut next = self.next_number.lock().unwrap();
            *next += 1;
            *next
        };
        self.record(GitHubCall::CreatePullRequest {
            number,
            title: title.to_string(),
            body: body.to_string(),
            head: head.to_string(),
            base: base.to_string(),
        });
        Ok(CreatedPullRequest {
            number,
            html_url: Some(format!("https://github.com/contoso-gh/app/pull/{number}")),
        })
    }

    async fn add_labels(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError> {
        if self.failing_labels {
            return Err(GitHubError::NotFound {
                message: "Label does not exist".to_string(),
            });
        }
        self.record(GitHubCall::AddLabels {
            number: pr_number,
            labels: labels.to_vec(),
        });
        Ok(())
    }

    async fn create_pull_request_comment(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        if self.failing_comments.iter().any(|needle| body.contains(needle.as_str())) {
            return Err(GitHubError::Network {
                message: "connection reset".to_string(),
            });
        }
        self.record(GitHubCall::Comment {
            number: pr_number,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn close_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
    ) -> Result<(), GitHubError> {
        self.record(GitHubCall::Close { number: pr_number });
        Ok(())
    }
}

