//! Translation of Azure DevOps branch policies into GitHub branch protection
//!
//! Two output profiles are produced. [`Fidelity::Full`] carries everything the
//! source policies express; [`Fidelity::Basic`] leaves out the settings GitHub
//! only offers on paid plans for private repositories, and is used as the
//! fallback when GitHub rejects the full descriptor.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::azure_devops::{PolicyKind, SourceBranchPolicy};
use crate::config::ReviewCountLimits;
use crate::github::{BranchProtection, RequiredPullRequestReviews, RequiredStatusChecks};
use crate::logging::MigrationLogger;

const HEADS_PREFIX: &str = "refs/heads/";
const BASIC_APPROVING_REVIEW_COUNT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    Full,
    Basic,
}

impl std::fmt::Display for Fidelity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fidelity::Full => f.write_str("full"),
            Fidelity::Basic => f.write_str("basic"),
        }
    }
}

/// What the enabled policies of one branch add up to
#[derive(Debug, Default)]
struct PolicySummary {
    has_reviewer: bool,
    min_reviewers: u32,
    dismiss_stale_reviews: bool,
    require_last_push_approval: bool,
    status_checks: BTreeSet<String>,
    conversation_resolution: bool,
}

pub struct BranchPolicyTransformer {
    logger: Arc<dyn MigrationLogger>,
    limits: ReviewCountLimits,
}

impl BranchPolicyTransformer {
    pub fn new(logger: Arc<dyn MigrationLogger>, limits: ReviewCountLimits) -> Self {
        Self { logger, limits }
    }

    /// Build the protection descriptor for `branch_name` from its policies.
    ///
    /// Returns `None` when no enabled policy applies, or when a basic profile
    /// would end up with neither review nor status check requirements.
    pub fn transform_policies(
        &self,
        policies: &[SourceBranchPolicy],
        branch_name: &str,
        fidelity: Fidelity,
    ) -> Option<BranchProtection> {
        let enabled: Vec<&SourceBranchPolicy> =
            policies.iter().filter(|policy| policy.is_enabled).collect();
        if enabled.is_empty() {
            self.logger.warning(&format!(
                "No enabled policies found for branch '{branch_name}'"
            ));
            return None;
        }

        let summary = self.summarize(&enabled, branch_name);

        let required_status_checks =
            (!summary.status_checks.is_empty()).then(|| RequiredStatusChecks {
                strict: true,
                contexts: summary.status_checks.clone(),
            });

        let required_pull_request_reviews = summary.has_reviewer.then(|| match fidelity {
            Fidelity::Full => RequiredPullRequestReviews {
                require_code_owner_reviews: false,
                required_approving_review_count: self.limits.clamp(summary.min_reviewers),
                dismiss_stale_reviews: Some(summary.dismiss_stale_reviews),
                require_last_push_approval: Some(summary.require_last_push_approval),
            },
            Fidelity::Basic => RequiredPullRequestReviews {
                require_code_owner_reviews: false,
                required_approving_review_count: BASIC_APPROVING_REVIEW_COUNT,
                dismiss_stale_reviews: None,
                require_last_push_approval: None,
            },
        });

        let protection = match fidelity {
            Fidelity::Full => BranchProtection {
                required_status_checks,
                required_pull_request_reviews,
                required_linear_history: Some(false),
                allow_force_pushes: Some(false),
                allow_deletions: Some(false),
                required_conversation_resolution: summary.conversation_resolution.then_some(true),
            },
            Fidelity::Basic => BranchProtection {
                required_status_checks,
                required_pull_request_reviews,
                ..Default::default()
            },
        };

        if fidelity == Fidelity::Basic && !protection.has_reviews() && !protection.has_status_checks()
        {
            self.logger.warning(&format!(
                "Branch '{branch_name}' has no reviewer or build policies that can be applied with basic protection"
            ));
            return None;
        }

        Some(protection)
    }

    fn summarize(&self, policies: &[&SourceBranchPolicy], branch_name: &str) -> PolicySummary {
        let mut summary = PolicySummary::default();

        for policy in policies {
            let settings = &policy.settings;
            match &policy.kind {
                PolicyKind::MinimumReviewers => {
                    summary.has_reviewer = true;
                    let configured = settings
                        .minimum_approver_count
                        .unwrap_or(self.limits.default_count);
                    summary.min_reviewers = summary
                        .min_reviewers
                        .max(configured)
                        .max(self.limits.default_count);
                    summary.dismiss_stale_reviews |= settings.reset_on_source_push.unwrap_or(false);
                    summary.require_last_push_approval |=
                        settings.block_last_pusher_vote.unwrap_or(false);
                }
                PolicyKind::BuildValidation => {
                    let context = settings
                        .display_name
                        .as_deref()
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Build-{}", policy.id));
                    summary.status_checks.insert(context);
                }
                PolicyKind::CommentRequirements => {
                    summary.conversation_resolution = true;
                }
                PolicyKind::WorkItemLinking => {
                    self.logger.warning(&format!(
                        "Branch '{branch_name}': work item linking policy has no GitHub equivalent and was not migrated"
                    ));
                }
                PolicyKind::MergeStrategy => {
                    self.logger.warning(&format!(
                        "Branch '{branch_name}': merge strategy policy is a repository setting on GitHub and was not migrated"
                    ));
                }
                PolicyKind::Unknown { .. } => {
                    self.logger.warning(&format!(
                        "Branch '{branch_name}': unsupported policy type {} was not migrated",
                        policy.kind.label()
                    ));
                }
            }
        }

        summary
    }

    /// Branch names targeted by enabled policies.
    ///
    /// Wildcard and folder (prefix) scopes are left out: they need
    /// pattern-based rules configured by hand on GitHub.
    pub fn protected_branches(&self, policies: &[SourceBranchPolicy]) -> BTreeSet<String> {
        let mut branches = BTreeSet::new();

        for policy in policies.iter().filter(|policy| policy.is_enabled) {
            for scope in &policy.settings.scope {
                let Some(ref_name) = scope.ref_name.as_deref() else {
                    continue;
                };
                let name = ref_name.strip_prefix(HEADS_PREFIX).unwrap_or(ref_name);

                if name.contains('*') {
                    self.logger.warning(&format!(
                        "Skipping wildcard branch pattern '{ref_name}': configure a pattern rule manually on GitHub"
                    ));
                    continue;
                }
                if scope.is_prefix_match() {
                    self.logger.warning(&format!(
                        "Skipping branch folder '{ref_name}' (prefix match): configure a pattern rule manually on GitHub"
                    ));
                    continue;
                }
                if name.is_empty() {
                    continue;
                }

                branches.insert(name.to_string());
            }
        }

        branches
    }

    /// Enabled policies whose scope names `branch_name`, with or without the
    /// `refs/heads/` prefix, compared case-insensitively
    pub fn policies_for_branch(
        policies: &[SourceBranchPolicy],
        branch_name: &str,
    ) -> Vec<SourceBranchPolicy> {
        let full_ref = format!("{HEADS_PREFIX}{branch_name}");

        policies
            .iter()
            .filter(|policy| policy.is_enabled)
            .filter(|policy| {
                policy.settings.scope.iter().any(|scope| {
                    scope.ref_name.as_deref().is_some_and(|ref_name| {
                        ref_name.eq_ignore_ascii_case(&full_ref)
                            || ref_name.eq_ignore_ascii_case(branch_name)
                    })
                })
            })
            .cloned()
            .collect()
    }
}
