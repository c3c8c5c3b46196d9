pub mod branches;
pub mod client;
pub mod errors;
pub mod pulls;
pub mod types;

pub use client::{GitHubClient, GitHubOps};
pub use errors::GitHubError;
pub use types::{BranchProtection, CreatedPullRequest, RequiredPullRequestReviews, RequiredStatusChecks};
