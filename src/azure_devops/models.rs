//! Azure DevOps data models
//!
//! Snapshots of branch policies, pull requests and comment threads as returned
//! by the Azure DevOps REST API (version 7.1). Only the fields the migration
//! reads are modelled; everything else in the payload is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Well-known policy type ids
pub mod policy_type_ids {
    pub const MINIMUM_REVIEWERS: &str = "fa4e907d-c16b-4a4c-9dfa-4906e5d171dd";
    pub const BUILD_VALIDATION: &str = "0609b952-1397-4640-95ec-e00a01b2c241";
    pub const COMMENT_REQUIREMENTS: &str = "c6a1889d-b943-4856-b76f-9e46bb6b0df2";
    pub const WORK_ITEM_LINKING: &str = "40e92b44-2fe1-4dd6-b3d8-74a9c21d0c6e";
    pub const MERGE_STRATEGY: &str = "fa4e907d-c16b-4a4c-9dfa-4916e5d171ab";
}

/// Kind of a branch policy, resolved from its type id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyKind {
    MinimumReviewers,
    BuildValidation,
    CommentRequirements,
    WorkItemLinking,
    MergeStrategy,
    Unknown {
        type_id: String,
        display_name: Option<String>,
    },
}

impl PolicyKind {
    pub fn from_type_id(type_id: &str, display_name: Option<&str>) -> Self {
        use policy_type_ids::*;

        let matches = |known: &str| type_id.eq_ignore_ascii_case(known);
        if matches(MINIMUM_REVIEWERS) {
            PolicyKind::MinimumReviewers
        } else if matches(BUILD_VALIDATION) {
            PolicyKind::BuildValidation
        } else if matches(COMMENT_REQUIREMENTS) {
            PolicyKind::CommentRequirements
        } else if matches(WORK_ITEM_LINKING) {
            PolicyKind::WorkItemLinking
        } else if matches(MERGE_STRATEGY) {
            PolicyKind::MergeStrategy
        } else {
            PolicyKind::Unknown {
                type_id: type_id.to_string(),
                display_name: display_name.map(str::to_string),
            }
        }
    }

    /// Human readable label used in log output
    pub fn label(&self) -> String {
        match self {
            PolicyKind::MinimumReviewers => "Minimum number of reviewers".to_string(),
            PolicyKind::BuildValidation => "Build validation".to_string(),
            PolicyKind::CommentRequirements => "Comment requirements".to_string(),
            PolicyKind::WorkItemLinking => "Work item linking".to_string(),
            PolicyKind::MergeStrategy => "Require a merge strategy".to_string(),
            PolicyKind::Unknown {
                type_id,
                display_name,
            } => match display_name {
                Some(name) => format!("{name} ({type_id})"),
                None => type_id.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct PolicyTypeRef {
    id: String,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

fn deserialize_policy_kind<'de, D>(deserializer: D) -> Result<PolicyKind, D::Error>
where
    D: Deserializer<'de>,
{
    let type_ref = PolicyTypeRef::deserialize(deserializer)?;
    Ok(PolicyKind::from_type_id(
        &type_ref.id,
        type_ref.display_name.as_deref(),
    ))
}

/// One entry of a policy's scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyScope {
    pub ref_name: Option<String>,
    pub match_kind: Option<String>,
    pub repository_id: Option<String>,
}

impl PolicyScope {
    /// Folder-style scopes (`refs/heads/release/` with match kind `prefix`)
    pub fn is_prefix_match(&self) -> bool {
        self.match_kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("prefix"))
    }
}

/// Settings bag shared by every policy kind; each kind reads its own subset
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySettings {
    pub build_definition_id: Option<i64>,
    pub display_name: Option<String>,
    pub queue_on_source_update_only: Option<bool>,
    pub manual_queue_only: Option<bool>,
    pub valid_duration: Option<f64>,
    pub minimum_approver_count: Option<u32>,
    pub creator_vote_counts: Option<bool>,
    pub allow_downvotes: Option<bool>,
    pub reset_on_source_push: Option<bool>,
    pub require_vote_on_last_iteration: Option<bool>,
    pub block_last_pusher_vote: Option<bool>,
    pub scope: Vec<PolicyScope>,
}

/// A branch policy configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBranchPolicy {
    pub id: i64,
    #[serde(rename = "type", deserialize_with = "deserialize_policy_kind")]
    pub kind: PolicyKind,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_blocking: bool,
    #[serde(default)]
    pub settings: PolicySettings,
}

/// Pull request status as reported by Azure DevOps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PullRequestStatus {
    Active,
    Completed,
    Abandoned,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PullRequestStatus::Active => "Active",
            PullRequestStatus::Completed => "Completed",
            PullRequestStatus::Abandoned => "Abandoned",
            PullRequestStatus::Other => "Other",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    pub display_name: Option<String>,
    pub unique_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectRef {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepositoryRef {
    pub name: Option<String>,
    pub project: Option<ProjectRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePullRequest {
    #[serde(rename = "pullRequestId")]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub status: PullRequestStatus,
    pub created_by: Option<IdentityRef>,
    pub creation_date: Option<DateTime<Utc>>,
    pub closed_date: Option<DateTime<Utc>>,
    pub source_ref_name: Option<String>,
    pub target_ref_name: Option<String>,
    pub url: Option<String>,
    pub repository: Option<RepositoryRef>,
}

impl SourcePullRequest {
    pub fn repository_name(&self) -> Option<&str> {
        self.repository.as_ref()?.name.as_deref()
    }

    pub fn project_name(&self) -> Option<&str> {
        self.repository.as_ref()?.project.as_ref()?.name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceComment {
    pub id: i64,
    pub content: Option<String>,
    pub author: Option<IdentityRef>,
    pub published_date: Option<DateTime<Utc>>,
    /// `text`, `system` or `codeChange`; absent on older servers
    #[serde(default)]
    pub comment_type: Option<String>,
}

impl SourceComment {
    /// Votes, status changes and pushes recorded by Azure DevOps itself
    pub fn is_system(&self) -> bool {
        self.comment_type
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("system"))
    }

    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .is_some_and(|content| !content.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceCommentThread {
    pub id: i64,
    #[serde(default)]
    pub comments: Vec<SourceComment>,
}

/// Envelope used by every Azure DevOps list endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryInfo {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policy_kind_resolves_known_ids_case_insensitively() {
        let kind = PolicyKind::from_type_id("FA4E907D-C16B-4A4C-9DFA-4906E5D171DD", None);
        assert_eq!(kind, PolicyKind::MinimumReviewers);

        let kind = PolicyKind::from_type_id(policy_type_ids::MERGE_STRATEGY, None);
        assert_eq!(kind, PolicyKind::MergeStrategy);
    }

    #[test]
    fn test_unknown_policy_kind_keeps_raw_id() {
        let kind = PolicyKind::from_type_id("1234", Some("File size restriction"));
        assert_eq!(
            kind,
            PolicyKind::Unknown {
                type_id: "1234".to_string(),
                display_name: Some("File size restriction".to_string()),
            }
        );
        assert_eq!(kind.label(), "File size restriction (1234)");
    }

    #[test]
    fn test_policy_deserializes_from_api_payload() {
        let payload = json!({
            "id": 17,
            "isEnabled": true,
            "isBlocking": true,
            "type": {
                "id": "0609b952-1397-4640-95ec-e00a01b2c241",
                "displayName": "Build"
            },
            "settings": {
                "buildDefinitionId": 5,
                "displayName": "CI",
                "validDuration": 720.0,
                "scope": [
                    { "refName": "refs/heads/main", "matchKind": "Exact", "repositoryId": "abc" }
                ]
            }
        });

        let policy: SourceBranchPolicy = serde_json::from_value(payload).unwrap();
        assert_eq!(policy.kind, PolicyKind::BuildValidation);
        assert!(policy.is_enabled);
        assert_eq!(policy.settings.display_name.as_deref(), Some("CI"));
        assert_eq!(policy.settings.scope.len(), 1);
        assert_eq!(
            policy.settings.scope[0].ref_name.as_deref(),
            Some("refs/heads/main")
        );
    }

    #[test]
    fn test_unrecognized_pr_status_maps_to_other() {
        let payload = json!({
            "pullRequestId": 3,
            "title": "t",
            "status": "notSet"
        });
        let pr: SourcePullRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(pr.status, PullRequestStatus::Other);
    }

    #[test]
    fn test_comment_with_whitespace_only_has_no_content() {
        let comment = SourceComment {
            id: 1,
            content: Some("   \n".to_string()),
            author: None,
            published_date: None,
            comment_type: None,
        };
        assert!(!comment.has_content());
    }

    #[test]
    fn test_system_comment_is_detected_from_comment_type() {
        let payload = serde_json::json!({
            "id": 2,
            "content": "Dana voted 10",
            "commentType": "system"
        });
        let comment: SourceComment = serde_json::from_value(payload).unwrap();
        assert!(comment.is_system());
        assert!(comment.has_content());

        let text: SourceComment =
            serde_json::from_value(serde_json::json!({ "id": 3, "commentType": "text" })).unwrap();
        assert!(!text.is_system());
    }
}
