use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Status checks that must pass before merging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredStatusChecks {
    pub strict: bool,
    pub contexts: BTreeSet<String>,
}

/// Review requirements for pull requests into the branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredPullRequestReviews {
    pub require_code_owner_reviews: bool,
    pub required_approving_review_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismiss_stale_reviews: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_last_push_approval: Option<bool>,
}

/// Branch protection descriptor applied to a single target branch.
///
/// Every field is optional: a `None` field is left unset on the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProtection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_status_checks: Option<RequiredStatusChecks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_pull_request_reviews: Option<RequiredPullRequestReviews>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_linear_history: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_force_pushes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_deletions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_conversation_resolution: Option<bool>,
}

impl BranchProtection {
    pub fn has_reviews(&self) -> bool {
        self.required_pull_request_reviews.is_some()
    }

    pub fn has_status_checks(&self) -> bool {
        self.required_status_checks.is_some()
    }
}

/// Request body for `PUT /repos/{owner}/{repo}/branches/{branch}/protection`.
///
/// GitHub requires the four top-level keys to be present; `null` leaves the
/// corresponding rule unconfigured.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateBranchProtectionRequest<'a> {
    pub required_status_checks: Option<&'a RequiredStatusChecks>,
    pub enforce_admins: Option<bool>,
    pub required_pull_request_reviews: Option<&'a RequiredPullRequestReviews>,
    pub restrictions: Option<()>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_linear_history: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_force_pushes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_deletions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_conversation_resolution: Option<bool>,
}

impl<'a> From<&'a BranchProtection> for UpdateBranchProtectionRequest<'a> {
    fn from(protection: &'a BranchProtection) -> Self {
        Self {
            required_status_checks: protection.required_status_checks.as_ref(),
            enforce_admins: None,
            required_pull_request_reviews: protection.required_pull_request_reviews.as_ref(),
            restrictions: None,
            required_linear_history: protection.required_linear_history,
            allow_force_pushes: protection.allow_force_pushes,
            allow_deletions: protection.allow_deletions,
            required_conversation_resolution: protection.required_conversation_resolution,
        }
    }
}

/// A pull request created on the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPullRequest {
    pub number: u64,
    pub html_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_sends_required_keys_as_null() {
        let protection = BranchProtection {
            required_pull_request_reviews: Some(RequiredPullRequestReviews {
                require_code_owner_reviews: false,
                required_approving_review_count: 1,
                dismiss_stale_reviews: None,
                require_last_push_approval: None,
            }),
            ..Default::default()
        };

        let body = serde_json::to_value(UpdateBranchProtectionRequest::from(&protection)).unwrap();
        assert_eq!(
            body,
            json!({
                "required_status_checks": null,
                "enforce_admins": null,
                "required_pull_request_reviews": {
                    "require_code_owner_reviews": false,
                    "required_approving_review_count": 1
                },
                "restrictions": null
            })
        );
    }

    #[test]
    fn test_full_descriptor_serializes_all_fields() {
        let protection = BranchProtection {
            required_status_checks: Some(RequiredStatusChecks {
                strict: true,
                contexts: ["CI".to_string()].into_iter().collect(),
            }),
            required_linear_history: Some(false),
            allow_force_pushes: Some(false),
            allow_deletions: Some(false),
            required_conversation_resolution: Some(true),
            ..Default::default()
        };

        let body = serde_json::to_value(UpdateBranchProtectionRequest::from(&protection)).unwrap();
        assert_eq!(body["required_status_checks"]["contexts"], json!(["CI"]));
        assert_eq!(body["required_linear_history"], json!(false));
        assert_eq!(body["required_conversation_resolution"], json!(true));
    }
}
