use std::collections::BTreeMap;
use std::sync::Arc;

use super::transformer::{
    branch_name, decorated_title, format_comment, generate_body, should_close_pr,
    should_migrate_pr,
};
use crate::azure_devops::{AzureDevOpsOps, PullRequestStatusFilter, SourcePullRequest};
use crate::errors::FailureKind;
use crate::github::GitHubOps;
use crate::logging::MigrationLogger;
use crate::migration::errors::MigrationError;
use crate::migration::outcome::{ItemOutcome, MigrationOutcome};
use crate::migration::report::{emit_summary, report_item_failure};
use crate::migration::RepositoryPair;

const CAVEATS: &[&str] = &[
    "Recreated pull requests get new numbers and creation timestamps; the originals are linked in each description",
    "Reviews, votes and iteration history are carried over only as comment text",
];

/// Which pull requests to recreate and what to attach to them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestMigrationOptions {
    pub include_abandoned: bool,
    pub include_completed: bool,
    pub include_active: bool,
    pub migrate_comments: bool,
    pub labels: Vec<String>,
}

impl Default for PullRequestMigrationOptions {
    fn default() -> Self {
        Self {
            include_abandoned: true,
            include_completed: false,
            include_active: false,
            migrate_comments: true,
            labels: Vec::new(),
        }
    }
}

pub struct PullRequestOrchestrator {
    source: Arc<dyn AzureDevOpsOps>,
    target: Arc<dyn GitHubOps>,
    logger: Arc<dyn MigrationLogger>,
}

impl PullRequestOrchestrator {
    pub fn new(
        source: Arc<dyn AzureDevOpsOps>,
        target: Arc<dyn GitHubOps>,
        logger: Arc<dyn MigrationLogger>,
    ) -> Self {
        Self {
            source,
            target,
            logger,
        }
    }

    /// Recreate the selected pull requests of one repository on GitHub.
    pub async fn migrate(
        &self,
        repos: &RepositoryPair,
        options: &PullRequestMigrationOptions,
    ) -> Result<MigrationOutcome, MigrationError> {
        self.logger.info(&format!(
            "🔀 Migrating pull requests from {} to {}",
            repos.source_label(),
            repos.target_label()
        ));

        let repo_id = self
            .source
            .resolve_repository_id(&repos.ado_org, &repos.ado_project, &repos.ado_repo)
            .await?;
        let pull_requests = self
            .source
            .list_pull_requests(
                &repos.ado_org,
                &repos.ado_project,
                &repo_id,
                PullRequestStatusFilter::All,
            )
            .await?;

        let selected: Vec<&SourcePullRequest> = pull_requests
            .iter()
            .filter(|pr| {
                should_migrate_pr(
                    pr,
                    options.include_abandoned,
                    options.include_completed,
                    options.include_active,
                )
            })
            .collect();

        if selected.is_empty() {
            self.logger
                .info("No pull requests match the selected statuses; nothing to migrate");
            let mut per_status: BTreeMap<String, usize> = BTreeMap::new();
            for pr in &pull_requests {
                *per_status.entry(pr.status.to_string()).or_default() += 1;
            }
            for (status, count) in per_status {
                self.logger.info(&format!("   {status}: {count}"));
            }
            return Ok(MigrationOutcome::default());
        }

        self.logger.info(&format!(
            "📋 {} of {} pull requests selected",
            selected.len(),
            pull_requests.len()
        ));

        let source_org_url = self.source.organization_url(&repos.ado_org);
        let mut plan_guidance_shown = false;
        let mut items = Vec::with_capacity(selected.len());
        for pr in selected {
            let item = format!("PR #{}", pr.id);
            self.logger.info("");
            self.logger.info(&format!("🔄 {item}: {}", pr.title));

            let outcome = match self
                .migrate_pull_request(repos, &repo_id, pr, options, &source_org_url)
                .await
            {
                Ok(outcome) => outcome,
                Err(err) => {
                    report_item_failure(
                        self.logger.as_ref(),
                        &item,
                        &err,
                        &mut plan_guidance_shown,
                    );
                    ItemOutcome::failed(item, err.kind(), err.to_string())
                }
            };
            items.push(outcome);
        }

        let outcome: MigrationOutcome = items.into_iter().collect();
        emit_summary(
            self.logger.as_ref(),
            "Pull request migration",
            &outcome,
            CAVEATS,
        );
        outcome.into_result()
    }

    async fn migrate_pull_request(
        &self,
        repos: &RepositoryPair,
        repo_id: &str,
        pr: &SourcePullRequest,
        options: &PullRequestMigrationOptions,
        source_org_url: &str,
    ) -> Result<ItemOutcome, MigrationError> {
        let item = format!("PR #{}", pr.id);
        let (owner, repo) = (repos.github_org.as_str(), repos.github_repo.as_str());

        let (Some(head), Some(base)) = (
            branch_name(pr.source_ref_name.as_deref()),
            branch_name(pr.target_ref_name.as_deref()),
        ) else {
            self.logger
                .warning(&format!("{item}: source or target branch is unknown; skipping"));
            return Ok(ItemOutcome::skipped(item, "missing branch names"));
        };

        for branch in [&head, &base] {
            if !self.target.branch_exists(owner, repo, branch).await? {
                self.logger.warning(&format!(
                    "{item}: branch '{branch}' does not exist in {owner}/{repo}; skipping"
                ));
                return Ok(ItemOutcome::skipped(
                    item,
                    format!("branch '{branch}' not found on GitHub"),
                ));
            }
        }

        let title = decorated_title(pr);
        let body = generate_body(pr, source_org_url);
        let created = match self
            .target
            .create_pull_request(owner, repo, &title, &body, &head, &base)
            .await
        {
            Ok(created) => created,
            Err(err) if err.kind() == FailureKind::MissingBranches => {
                self.logger.warning(&format!(
                    "{item}: GitHub reports that '{head}' or '{base}' does not exist; skipping"
                ));
                return Ok(ItemOutcome::skipped(item, "branches not found on GitHub"));
            }
            Err(err) => return Err(err.into()),
        };
        self.logger.verbose(&format!(
            "{item} created as #{}{}",
            created.number,
            created
                .html_url
                .as_deref()
                .map(|url| format!(" ({url})"))
                .unwrap_or_default()
        ));

        if !options.labels.is_empty() {
            self.target
                .add_labels(owner, repo, created.number, &options.labels)
                .await?;
        }

        if options.migrate_comments {
            match self
                .migrate_comments(repos, repo_id, pr.id, created.number, &item)
                .await
            {
                Ok(posted) => self
                    .logger
                    .verbose(&format!("{item}: {posted} comments migrated")),
                Err(err) => self.logger.warning(&format!(
                    "{item}: comments could not be migrated: {err}"
                )),
            }
        }

        if should_close_pr(pr) {
            self.target
                .close_pull_request(owner, repo, created.number)
                .await?;
        }

        self.logger.success(&format!(
            "{item} recreated as #{} ({})",
            created.number, pr.status
        ));
        Ok(ItemOutcome::succeeded_with_note(
            item,
            format!("#{}", created.number),
        ))
    }

    /// Post every non-empty, non-system comment of every thread, in order.
    /// A comment GitHub refuses is reported and the rest are still posted.
    /// Returns how many were posted.
    async fn migrate_comments(
        &self,
        repos: &RepositoryPair,
        repo_id: &str,
        pull_request_id: i64,
        number: u64,
        item: &str,
    ) -> Result<usize, MigrationError> {
        let threads = self
            .source
            .list_pull_request_threads(&repos.ado_org, &repos.ado_project, repo_id, pull_request_id)
            .await?;

        let mut posted = 0;
        for comment in threads
            .iter()
            .flat_map(|thread| thread.comments.iter())
            .filter(|comment| !comment.is_system() && comment.has_content())
        {
            let result = self
                .target
                .create_pull_request_comment(
                    &repos.github_org,
                    &repos.github_repo,
                    number,
                    &format_comment(comment),
                )
                .await;
            match result {
                Ok(()) => posted += 1,
                Err(err) => self.logger.warning(&format!(
                    "{item}: comment {} could not be posted: {err}",
                    comment.id
                )),
            }
        }
        Ok(posted)
    }
}
