//! Pure helpers that decide which pull requests to recreate and render their
//! titles, bodies and comments for GitHub.

use chrono::{DateTime, Utc};

use crate::azure_devops::models::IdentityRef;
use crate::azure_devops::{PullRequestStatus, SourceComment, SourcePullRequest};

const HEADS_PREFIX: &str = "refs/heads/";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
pub const NO_DESCRIPTION_MARKER: &str = "_No description provided._";
pub const NO_CONTENT_MARKER: &str = "_No content._";

pub fn should_migrate_pr(
    pr: &SourcePullRequest,
    include_abandoned: bool,
    include_completed: bool,
    include_active: bool,
) -> bool {
    match pr.status {
        PullRequestStatus::Abandoned => include_abandoned,
        PullRequestStatus::Completed => include_completed,
        PullRequestStatus::Active => include_active,
        PullRequestStatus::Other => false,
    }
}

/// Recreated pull requests are closed when the original is no longer open
pub fn should_close_pr(pr: &SourcePullRequest) -> bool {
    matches!(
        pr.status,
        PullRequestStatus::Abandoned | PullRequestStatus::Completed
    )
}

pub fn branch_name(ref_name: Option<&str>) -> Option<String> {
    let ref_name = ref_name?.trim();
    let name = ref_name.strip_prefix(HEADS_PREFIX).unwrap_or(ref_name);
    (!name.is_empty()).then(|| name.to_string())
}

pub fn decorated_title(pr: &SourcePullRequest) -> String {
    format!("[ADO #{}] {}", pr.id, pr.title)
}

/// Browser link to the original pull request, or its API url when the
/// repository and project names are unknown
pub fn source_link(pr: &SourcePullRequest, source_org_url: &str) -> Option<String> {
    match (pr.project_name(), pr.repository_name()) {
        (Some(project), Some(repo)) => Some(format!(
            "{}/{project}/_git/{repo}/pullrequest/{}",
            source_org_url.trim_end_matches('/'),
            pr.id
        )),
        _ => pr.url.clone(),
    }
}

pub fn generate_body(pr: &SourcePullRequest, source_org_url: &str) -> String {
    let mut body = String::from("> **Migrated from Azure DevOps**\n>\n");

    match source_link(pr, source_org_url) {
        Some(link) => body.push_str(&format!("> **Original PR:** [#{}]({link})\n", pr.id)),
        None => body.push_str(&format!("> **Original PR:** #{}\n", pr.id)),
    }
    body.push_str(&format!(
        "> **Author:** {}\n",
        author_label(pr.created_by.as_ref())
    ));
    body.push_str(&format!(
        "> **Created:** {}\n",
        timestamp_label(pr.creation_date)
    ));
    if let Some(closed) = pr.closed_date {
        body.push_str(&format!("> **Closed:** {}\n", closed.format(TIMESTAMP_FORMAT)));
    }
    body.push_str(&format!("> **Status:** {}\n", pr.status));
    body.push_str("\n---\n\n");

    match pr
        .description
        .as_deref()
        .map(str::trim)
        .filter(|description| !description.is_empty())
    {
        Some(description) => body.push_str(description),
        None => body.push_str(NO_DESCRIPTION_MARKER),
    }
    body.push('\n');

    body
}

pub fn format_comment(comment: &SourceComment) -> String {
    let content = comment
        .content
        .as_deref()
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .unwrap_or(NO_CONTENT_MARKER);

    format!(
        "**{}** commented on {}:\n\n{content}\n",
        author_label(comment.author.as_ref()),
        timestamp_label(comment.published_date)
    )
}

fn author_label(identity: Option<&IdentityRef>) -> String {
    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let Some(identity) = identity else {
        return "Unknown".to_string();
    };
    match (non_empty(&identity.display_name), non_empty(&identity.unique_name)) {
        (Some(display), Some(unique)) if display != unique => format!("{display} ({unique})"),
        (Some(display), _) => display,
        (None, Some(unique)) => unique,
        (None, None) => "Unknown".to_string(),
    }
}

fn timestamp_label(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure_devops::models::{ProjectRef, RepositoryRef};
    use chrono::TimeZone;

    fn pr(status: PullRequestStatus) -> SourcePullRequest {
        SourcePullRequest {
            id: 42,
            title: "Add caching".to_string(),
            description: Some("Adds an LRU cache.".to_string()),
            status,
            created_by: Some(IdentityRef {
                display_name: Some("Dana Smith".to_string()),
                unique_name: Some("dana@contoso.com".to_string()),
            }),
            creation_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
            closed_date: None,
            source_ref_name: Some("refs/heads/feature/cache".to_string()),
            target_ref_name: Some("refs/heads/main".to_string()),
            url: Some("https://dev.azure.com/contoso/_apis/git/pullRequests/42".to_string()),
            repository: Some(RepositoryRef {
                name: Some("app".to_string()),
                project: Some(ProjectRef {
                    name: Some("web".to_string()),
                }),
            }),
        }
    }

    #[test]
    fn test_should_migrate_follows_status_toggles() {
        let abandoned = pr(PullRequestStatus::Abandoned);
        let completed = pr(PullRequestStatus::Completed);
        let active = pr(PullRequestStatus::Active);
        let other = pr(PullRequestStatus::Other);

        assert!(should_migrate_pr(&abandoned, true, false, false));
        assert!(!should_migrate_pr(&completed, true, false, false));
        assert!(!should_migrate_pr(&active, true, false, false));
        assert!(should_migrate_pr(&completed, false, true, false));
        assert!(should_migrate_pr(&active, false, false, true));
        assert!(!should_migrate_pr(&other, true, true, true));
    }

    #[test]
    fn test_should_close_only_finished_prs() {
        assert!(should_close_pr(&pr(PullRequestStatus::Abandoned)));
        assert!(should_close_pr(&pr(PullRequestStatus::Completed)));
        assert!(!should_close_pr(&pr(PullRequestStatus::Active)));
        assert!(!should_close_pr(&pr(PullRequestStatus::Other)));
    }

    #[test]
    fn test_branch_name_strips_heads_prefix() {
        assert_eq!(
            branch_name(Some("refs/heads/release/1.0")).as_deref(),
            Some("release/1.0")
        );
        assert_eq!(branch_name(Some("main")).as_deref(), Some("main"));
        assert_eq!(branch_name(Some("refs/heads/")), None);
        assert_eq!(branch_name(None), None);
    }

    #[test]
    fn test_decorated_title() {
        assert_eq!(decorated_title(&pr(PullRequestStatus::Active)), "[ADO #42] Add caching");
    }

    #[test]
    fn test_body_contains_metadata_and_description() {
        let mut abandoned = pr(PullRequestStatus::Abandoned);
        abandoned.closed_date = Some(Utc.with_ymd_and_hms(2024, 3, 5, 17, 0, 0).unwrap());

        let body = generate_body(&abandoned, "https://dev.azure.com/contoso/");

        assert!(body.contains(
            "[#42](https://dev.azure.com/contoso/web/_git/app/pullrequest/42)"
        ));
        assert!(body.contains("**Author:** Dana Smith (dana@contoso.com)"));
        assert!(body.contains("**Created:** 2024-03-01 09:30:00 UTC"));
        assert!(body.contains("**Closed:** 2024-03-05 17:00:00 UTC"));
        assert!(body.contains("**Status:** Abandoned"));
        assert!(body.ends_with("Adds an LRU cache.\n"));
        assert_eq!(body, generate_body(&abandoned, "https://dev.azure.com/contoso/"));
    }

    #[test]
    fn test_body_falls_back_to_api_url_and_markers() {
        let mut bare = pr(PullRequestStatus::Active);
        bare.repository = None;
        bare.created_by = None;
        bare.description = Some("   ".to_string());

        let body = generate_body(&bare, "https://dev.azure.com/contoso");

        assert!(body.contains("(https://dev.azure.com/contoso/_apis/git/pullRequests/42)"));
        assert!(body.contains("**Author:** Unknown"));
        assert!(!body.contains("**Closed:**"));
        assert!(body.contains(NO_DESCRIPTION_MARKER));
    }

    #[test]
    fn test_format_comment() {
        let comment = SourceComment {
            id: 1,
            content: Some("Looks good".to_string()),
            author: Some(IdentityRef {
                display_name: Some("Lee".to_string()),
                unique_name: None,
            }),
            published_date: Some(Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap()),
            comment_type: Some("text".to_string()),
        };
        assert_eq!(
            format_comment(&comment),
            "**Lee** commented on 2024-03-02 08:00:00 UTC:\n\nLooks good\n"
        );

        let empty = SourceComment {
            content: None,
            author: None,
            ..comment
        };
        let text = format_comment(&empty);
        assert!(text.starts_with("**Unknown**"));
        assert!(text.contains(NO_CONTENT_MARKER));
    }
}
