use crate::errors::FailureKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AzureDevOpsError {
    #[error("Azure DevOps authentication failed (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },
    #[error("Azure DevOps resource not found: {resource}")]
    NotFound { resource: String },
    #[error("Azure DevOps rate limit exceeded: {message}")]
    RateLimited { message: String },
    #[error("Azure DevOps request failed (HTTP {status}): {message}")]
    Http { status: u16, message: String },
    #[error("Network error talking to Azure DevOps: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid response from Azure DevOps: {message}")]
    InvalidResponse { message: String },
}

impl AzureDevOpsError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AzureDevOpsError::Unauthorized { .. } => FailureKind::PermissionDenied,
            AzureDevOpsError::NotFound { .. } => FailureKind::NotFound,
            AzureDevOpsError::RateLimited { .. } => FailureKind::RateLimited,
            AzureDevOpsError::Network { .. } => FailureKind::Network,
            AzureDevOpsError::Http { .. } | AzureDevOpsError::InvalidResponse { .. } => {
                FailureKind::Unexpected
            }
        }
    }

    /// Map a non-success HTTP response onto an error variant
    pub(crate) fn from_status(status: u16, resource: &str, body: String) -> Self {
        match status {
            401 | 403 => AzureDevOpsError::Unauthorized {
                status,
                message: body,
            },
            404 => AzureDevOpsError::NotFound {
                resource: resource.to_string(),
            },
            429 => AzureDevOpsError::RateLimited { message: body },
            // Azure DevOps answers an expired PAT with a sign-in page redirect
            203 => AzureDevOpsError::Unauthorized {
                status,
                message: "the personal access token was rejected".to_string(),
            },
            _ => AzureDevOpsError::Http {
                status,
                message: body,
            },
        }
    }
}

impl From<reqwest::Error> for AzureDevOpsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AzureDevOpsError::InvalidResponse {
                message: err.to_string(),
            }
        } else {
            AzureDevOpsError::Network { source: err }
        }
    }
}
