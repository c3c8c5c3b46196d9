use crate::errors::FailureKind;
use octocrab::Error as OctocrabError;
use thiserror::Error;

/// Failure of a GitHub API call, already classified by kind.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub plan does not support this feature: {message}")]
    PlanLimitation { message: String },
    #[error("GitHub permission denied (HTTP {status}): {message}")]
    PermissionDenied { status: u16, message: String },
    #[error("GitHub resource not found: {message}")]
    NotFound { message: String },
    #[error("GitHub rejected the request as invalid: {message}")]
    InvalidConfiguration { message: String },
    #[error("Pull request branches do not exist on GitHub: {message}")]
    MissingBranches { message: String },
    #[error("GitHub rate limit exceeded: {message}")]
    RateLimited { message: String },
    #[error("Network error talking to GitHub: {message}")]
    Network { message: String },
    #[error("Unexpected GitHub error: {message}")]
    Unexpected { message: String, detail: String },
}

impl GitHubError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GitHubError::PlanLimitation { .. } => FailureKind::PlanLimitation,
            GitHubError::PermissionDenied { .. } => FailureKind::PermissionDenied,
            GitHubError::NotFound { .. } => FailureKind::NotFound,
            GitHubError::InvalidConfiguration { .. } => FailureKind::InvalidConfiguration,
            GitHubError::MissingBranches { .. } => FailureKind::MissingBranches,
            GitHubError::RateLimited { .. } => FailureKind::RateLimited,
            GitHubError::Network { .. } => FailureKind::Network,
            GitHubError::Unexpected { .. } => FailureKind::Unexpected,
        }
    }

    /// Full diagnostic detail, only shown at verbose level
    pub fn detail(&self) -> Option<&str> {
        match self {
            GitHubError::Unexpected { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// Classify a response status and message returned by the GitHub API
    pub fn from_response(status: u16, message: &str, errors: &[serde_json::Value]) -> Self {
        let lowered = message.to_lowercase();
        let message = message.to_string();
        match status {
            401 => GitHubError::PermissionDenied { status, message },
            403 if is_plan_limitation(&lowered) => GitHubError::PlanLimitation { message },
            403 if lowered.contains("rate limit") => GitHubError::RateLimited { message },
            403 => GitHubError::PermissionDenied { status, message },
            404 => GitHubError::NotFound { message },
            422 if names_missing_branch(errors) => GitHubError::MissingBranches { message },
            422 => GitHubError::InvalidConfiguration {
                message: describe_validation(message, errors),
            },
            429 => GitHubError::RateLimited { message },
            _ => GitHubError::Unexpected {
                detail: format!("HTTP {status}: {message} {errors:?}"),
                message,
            },
        }
    }
}

fn is_plan_limitation(lowered: &str) -> bool {
    lowered.contains("upgrade to github pro")
        || lowered.contains("make this repository public")
        || lowered.contains("not available for this repository")
}

/// PR creation answers an unknown head/base with a 422 naming the field
fn names_missing_branch(errors: &[serde_json::Value]) -> bool {
    errors.iter().any(|error| {
        let field = error.get("field").and_then(|f| f.as_str());
        let code = error.get("code").and_then(|c| c.as_str());
        matches!(field, Some("head") | Some("base")) && code == Some("invalid")
    })
}

fn describe_validation(message: String, errors: &[serde_json::Value]) -> String {
    let details: Vec<String> = errors
        .iter()
        .filter_map(|error| {
            error
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .or_else(|| error.as_str().map(str::to_string))
        })
        .collect();
    if details.is_empty() {
        message
    } else {
        format!("{message} ({})", details.join("; "))
    }
}

impl From<OctocrabError> for GitHubError {
    fn from(err: OctocrabError) -> Self {
        match &err {
            OctocrabError::GitHub { source, .. } => GitHubError::from_response(
                source.status_code.as_u16(),
                &source.message,
                source.errors.as_deref().unwrap_or_default(),
            ),
            OctocrabError::Http { .. }
            | OctocrabError::Hyper { .. }
            | OctocrabError::Service { .. } => GitHubError::Network {
                message: err.to_string(),
            },
            _ => GitHubError::Unexpected {
                message: "GitHub API call failed".to_string(),
                detail: format!("{err:?}"),
            },
        }
    }
}
