use std::sync::Arc;

use super::transformer::{BranchPolicyTransformer, Fidelity};
use crate::azure_devops::{AzureDevOpsOps, SourceBranchPolicy};
use crate::config::ReviewCountLimits;
use crate::errors::FailureKind;
use crate::github::{BranchProtection, GitHubError, GitHubOps};
use crate::logging::MigrationLogger;
use crate::migration::errors::MigrationError;
use crate::migration::outcome::{ItemOutcome, MigrationOutcome};
use crate::migration::report::{emit_summary, report_item_failure};
use crate::migration::RepositoryPair;

const CAVEATS: &[&str] = &[
    "Work item linking policies: GitHub has no equivalent; consider a PR template or a required check",
    "Merge strategy policies: configure allowed merge methods in the GitHub repository settings",
    "Wildcard (`*`) patterns and folder scopes (prefix match, e.g. refs/heads/release/) are not protected: create matching rulesets or pattern rules manually",
];

/// Re-creates source branch policies as GitHub branch protection, one branch
/// at a time.
pub struct BranchPolicyOrchestrator {
    source: Arc<dyn AzureDevOpsOps>,
    target: Arc<dyn GitHubOps>,
    transformer: BranchPolicyTransformer,
    logger: Arc<dyn MigrationLogger>,
}

impl BranchPolicyOrchestrator {
    pub fn new(
        source: Arc<dyn AzureDevOpsOps>,
        target: Arc<dyn GitHubOps>,
        logger: Arc<dyn MigrationLogger>,
        limits: ReviewCountLimits,
    ) -> Self {
        Self {
            source,
            target,
            transformer: BranchPolicyTransformer::new(logger.clone(), limits),
            logger,
        }
    }

    /// Migrate the branch policies of one repository.
    ///
    /// Every protected branch is attempted; per-branch failures are recorded
    /// and turned into [`MigrationError::Incomplete`] once the summary has been
    /// printed.
    pub async fn migrate(&self, repos: &RepositoryPair) -> Result<MigrationOutcome, MigrationError> {
        self.logger.info(&format!(
            "🔐 Migrating branch policies from {} to {}",
            repos.source_label(),
            repos.target_label()
        ));

        let repo_id = self
            .source
            .resolve_repository_id(&repos.ado_org, &repos.ado_project, &repos.ado_repo)
            .await?;
        self.logger
            .verbose(&format!("Azure DevOps repository id: {repo_id}"));

        let policies = self
            .source
            .list_branch_policies(&repos.ado_org, &repos.ado_project, &repo_id)
            .await?;
        if policies.is_empty() {
            self.logger
                .success("No branch policies found in the source repository; nothing to migrate");
            return Ok(MigrationOutcome::default());
        }
        let enabled = policies.iter().filter(|policy| policy.is_enabled).count();
        self.logger.info(&format!(
            "📋 Found {} branch policies ({enabled} enabled)",
            policies.len()
        ));

        let branches = self.transformer.protected_branches(&policies);
        if branches.is_empty() {
            self.logger.warning(
                "No branches with exact-name policies found. Wildcard or folder patterns must be configured manually as pattern rules on GitHub",
            );
            return Ok(MigrationOutcome::default());
        }
        self.logger.info(&format!(
            "🌿 {} protected branches: {}",
            branches.len(),
            branches.iter().cloned().collect::<Vec<_>>().join(", ")
        ));

        let mut plan_guidance_shown = false;
        let mut items = Vec::with_capacity(branches.len());
        for branch in &branches {
            self.logger.info("");
            self.logger.info(&format!("🔄 Branch '{branch}'"));

            let item = match self.migrate_branch(repos, branch, &policies).await {
                Ok(item) => item,
                Err(err) => {
                    report_item_failure(
                        self.logger.as_ref(),
                        &format!("Branch '{branch}'"),
                        &err,
                        &mut plan_guidance_shown,
                    );
                    ItemOutcome::failed(branch.as_str(), err.kind(), err.to_string())
                }
            };
            items.push(item);
        }

        let outcome: MigrationOutcome = items.into_iter().collect();
        emit_summary(
            self.logger.as_ref(),
            "Branch policy migration",
            &outcome,
            CAVEATS,
        );
        outcome.into_result()
    }

    async fn migrate_branch(
        &self,
        repos: &RepositoryPair,
        branch: &str,
        policies: &[SourceBranchPolicy],
    ) -> Result<ItemOutcome, MigrationError> {
        let (owner, repo) = (repos.github_org.as_str(), repos.github_repo.as_str());

        if !self.target.branch_exists(owner, repo, branch).await? {
            self.logger.warning(&format!(
                "Branch '{branch}' does not exist in {owner}/{repo}; skipping"
            ));
            return Ok(ItemOutcome::skipped(branch, "branch not found on GitHub"));
        }

        let branch_policies = BranchPolicyTransformer::policies_for_branch(policies, branch);
        self.logger.verbose(&format!(
            "{} policies apply to '{branch}'",
            branch_policies.len()
        ));

        let Some(full) = self
            .transformer
            .transform_policies(&branch_policies, branch, Fidelity::Full)
        else {
            return Ok(ItemOutcome::skipped(branch, "no applicable policies"));
        };

        match self.target.get_branch_protection(owner, repo, branch).await {
            Ok(Some(_)) => self.logger.verbose(&format!(
                "Branch '{branch}' already has protection; it will be replaced"
            )),
            Ok(None) => self
                .logger
                .verbose(&format!("Branch '{branch}' has no existing protection")),
            Err(err) => self.logger.verbose(&format!(
                "Could not read existing protection of '{branch}': {err}"
            )),
        }

        let applied = self
            .apply_protection(owner, repo, branch, &branch_policies, &full)
            .await?;

        match applied {
            Fidelity::Full => {
                self.logger
                    .success(&format!("Branch '{branch}' protected"));
                Ok(ItemOutcome::succeeded(branch))
            }
            Fidelity::Basic => {
                self.logger.success(&format!(
                    "Branch '{branch}' protected with basic settings (review count 1, no advanced rules)"
                ));
                Ok(ItemOutcome::succeeded_with_note(branch, "basic protection"))
            }
        }
    }

    /// Apply the full descriptor; when GitHub rejects it as invalid, retry
    /// once with the basic profile. Returns the profile that was applied.
    async fn apply_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        policies: &[SourceBranchPolicy],
        full: &BranchProtection,
    ) -> Result<Fidelity, GitHubError> {
        let err = match self
            .target
            .update_branch_protection(owner, repo, branch, full)
            .await
        {
            Ok(()) => return Ok(Fidelity::Full),
            Err(err) if err.kind() == FailureKind::InvalidConfiguration => err,
            Err(err) => return Err(err),
        };

        self.logger.warning(&format!(
            "Full protection for '{branch}' was rejected ({err}); retrying with basic protection"
        ));
        let Some(basic) = self
            .transformer
            .transform_policies(policies, branch, Fidelity::Basic)
        else {
            return Err(err);
        };

        self.target
            .update_branch_protection(owner, repo, branch, &basic)
            .await?;
        Ok(Fidelity::Basic)
    }
}
