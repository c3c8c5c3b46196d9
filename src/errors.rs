/// Semantic classification of a failed platform call.
///
/// Both platform clients map their transport-level failures onto these kinds
/// so the migration orchestrators can branch on them without looking at
/// error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The target plan does not offer the requested feature
    PlanLimitation,
    PermissionDenied,
    NotFound,
    /// The submitted configuration was rejected by validation
    InvalidConfiguration,
    /// Head or base branch of a pull request is missing on the target
    MissingBranches,
    RateLimited,
    Network,
    Unexpected,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::PlanLimitation => "plan limitation",
            FailureKind::PermissionDenied => "permission denied",
            FailureKind::NotFound => "not found",
            FailureKind::InvalidConfiguration => "invalid configuration",
            FailureKind::MissingBranches => "missing branches",
            FailureKind::RateLimited => "rate limited",
            FailureKind::Network => "network error",
            FailureKind::Unexpected => "unexpected error",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
