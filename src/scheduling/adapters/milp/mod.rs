//! Mixed-integer optimizer adapter backed by `good_lp`.
//!
//! The model is solved with the pure-Rust `microlp` backend, so no system
//! solver library is needed.

mod model;

use crate::scheduling::{
    domain::{AssignmentPlan, CostModel, SchedulingSnapshot},
    ports::{AssignmentOptimizer, OptimizerResult},
};
use model::AssignmentModel;

/// Assignment optimizer that builds and solves one binary program per run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MilpAssignmentOptimizer {
    cost_model: CostModel,
}

impl MilpAssignmentOptimizer {
    /// Creates an optimizer using the given objective coefficients.
    #[must_use]
    pub const fn new(cost_model: CostModel) -> Self {
        Self { cost_model }
    }

    /// Returns the objective coefficients in use.
    #[must_use]
    pub const fn cost_model(&self) -> CostModel {
        self.cost_model
    }
}

impl AssignmentOptimizer for MilpAssignmentOptimizer {
    fn optimize(&self, snapshot: &SchedulingSnapshot) -> OptimizerResult<AssignmentPlan> {
        if snapshot.is_empty() {
            tracing::debug!("snapshot has no tasks, skipping solve");
            return Ok(AssignmentPlan::empty(snapshot.taken_at()));
        }

        let model = AssignmentModel::build(snapshot, &self.cost_model);
        let (assignments, queued) = if model.has_candidate_pairs() {
            tracing::debug!(
                tasks = snapshot.tasks().len(),
                workers = snapshot.workers().len(),
                pairs = model.pair_count(),
                "solving assignment model"
            );
            model.solve()?
        } else {
            tracing::debug!(
                tasks = snapshot.tasks().len(),
                "no eligible worker has room, queueing every task"
            );
            (Vec::new(), snapshot.tasks().keys().copied().collect())
        };

        let draft = AssignmentPlan::new(snapshot.taken_at(), assignments, queued, 0.0);
        let objective = self.cost_model.objective(&draft, snapshot);
        let plan = draft.with_objective(objective);
        plan.validate_against(snapshot)?;
        Ok(plan)
    }
}
