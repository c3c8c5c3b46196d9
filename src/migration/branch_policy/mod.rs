pub mod orchestrator;
pub mod transformer;

pub use orchestrator::BranchPolicyOrchestrator;
pub use transformer::{BranchPolicyTransformer, Fidelity};
