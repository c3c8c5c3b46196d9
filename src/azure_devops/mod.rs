pub mod client;
pub mod errors;
pub mod models;

pub use client::{AzureDevOpsClient, AzureDevOpsOps, PullRequestStatusFilter};
pub use errors::AzureDevOpsError;
pub use models::{
    PolicyKind, PolicyScope, PolicySettings, PullRequestStatus, SourceBranchPolicy,
    SourceComment, SourceCommentThread, SourcePullRequest,
};
