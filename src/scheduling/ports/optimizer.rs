//! Solver port turning a snapshot into an assignment plan.

use crate::scheduling::domain::{AssignmentPlan, PlanViolation, SchedulingSnapshot};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Result type for optimizer operations.
pub type OptimizerResult<T> = Result<T, OptimizerError>;

/// Computes a plan for one snapshot.
///
/// Implementations are synchronous and deterministic for a given snapshot up
/// to ties in the objective.
#[cfg_attr(test, automock)]
pub trait AssignmentOptimizer: Send + Sync {
    /// Partitions the snapshot's tasks into assignments and queued tasks.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError`] when the solver cannot produce a result.
    fn optimize(&self, snapshot: &SchedulingSnapshot) -> OptimizerResult<AssignmentPlan>;
}

/// Errors returned by optimizer implementations.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// The solving engine reported a failure.
    #[error("solver failed: {0}")]
    Solver(String),

    /// The solver's answer breaks a model constraint.
    #[error("solver returned an invalid plan: {0}")]
    InvalidPlan(#[from] PlanViolation),

    /// The blocking solve could not be joined.
    #[error("solver task did not complete: {0}")]
    Interrupted(String),
}
