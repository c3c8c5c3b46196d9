pub mod orchestrator;
pub mod transformer;

pub use orchestrator::{PullRequestMigrationOptions, PullRequestOrchestrator};
