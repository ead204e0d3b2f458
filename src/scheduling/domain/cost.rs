//! Objective coefficients for the assignment model.

#![expect(
    clippy::float_arithmetic,
    reason = "objective coefficients are real-valued"
)]

use super::{AssignmentPlan, SchedulingSnapshot, TaskCandidate, WorkerCandidate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weights and penalties that define the optimizer's objective.
///
/// Assigning task `t` to worker `w` costs
/// `weight(t) * (workload(w) + duration(t))` with
/// `weight(t) = 1 + age_in_days(t) / aging_horizon_days`; leaving a task in
/// the queue costs `queue_penalty`. Older tasks are therefore more expensive
/// to assign, and are the ones left queued when capacity binds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    queue_penalty: f64,
    aging_horizon_days: u32,
}

impl CostModel {
    /// Penalty for leaving one task unassigned.
    pub const DEFAULT_QUEUE_PENALTY: f64 = 1000.0;
    /// Age at which a task's weight reaches 2.
    pub const DEFAULT_AGING_HORIZON_DAYS: u32 = 365;

    /// Creates a cost model.
    ///
    /// Callers validate inputs through [`crate::config::SchedulerConfig`].
    #[must_use]
    pub const fn new(queue_penalty: f64, aging_horizon_days: u32) -> Self {
        Self {
            queue_penalty,
            aging_horizon_days,
        }
    }

    /// Returns the queue penalty.
    #[must_use]
    pub const fn queue_penalty(&self) -> f64 {
        self.queue_penalty
    }

    /// Returns the aging horizon in days.
    #[must_use]
    pub const fn aging_horizon_days(&self) -> u32 {
        self.aging_horizon_days
    }

    /// Whole calendar days between the issue date and `as_of`, never negative.
    #[must_use]
    pub fn age_in_days(created_at: DateTime<Utc>, as_of: DateTime<Utc>) -> u32 {
        let days = (as_of.date_naive() - created_at.date_naive()).num_days();
        u32::try_from(days.max(0)).unwrap_or(u32::MAX)
    }

    /// Aging multiplier for a task issued at `created_at`.
    #[must_use]
    pub fn weight(&self, created_at: DateTime<Utc>, as_of: DateTime<Utc>) -> f64 {
        let age = f64::from(Self::age_in_days(created_at, as_of));
        1.0 + age / f64::from(self.aging_horizon_days.max(1))
    }

    /// Objective coefficient of assigning `task` to `worker`.
    #[must_use]
    pub fn assignment_cost(
        &self,
        task: &TaskCandidate,
        worker: &WorkerCandidate,
        as_of: DateTime<Utc>,
    ) -> f64 {
        self.weight(task.created_at, as_of) * (worker.workload.value() + task.duration.value())
    }

    /// Objective value of `plan` evaluated against `snapshot`.
    ///
    /// Pairs that reference entries missing from the snapshot contribute
    /// nothing; [`AssignmentPlan::validate_against`] reports those.
    #[must_use]
    pub fn objective(&self, plan: &AssignmentPlan, snapshot: &SchedulingSnapshot) -> f64 {
        let as_of = snapshot.taken_at();
        let assigned: f64 = plan
            .assignments()
            .iter()
            .filter_map(|pair| {
                let task = snapshot.tasks().get(&pair.task_id)?;
                let worker = snapshot.workers().get(&pair.worker_id)?;
                Some(self.assignment_cost(task, worker, as_of))
            })
            .sum();
        let queued = plan.queued().len();
        let queued_count = u32::try_from(queued).map_or(f64::from(u32::MAX), f64::from);
        assigned + queued_count * self.queue_penalty
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_QUEUE_PENALTY,
            Self::DEFAULT_AGING_HORIZON_DAYS,
        )
    }
}
