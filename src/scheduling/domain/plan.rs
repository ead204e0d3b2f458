//! Result of one optimizer run.

#![expect(
    clippy::float_arithmetic,
    reason = "capacity checks compare fractional hour totals"
)]

use super::{Hours, SchedulingSnapshot, TaskId, WorkerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Slack allowed when comparing summed hours against a ceiling.
const CAPACITY_TOLERANCE: f64 = 1e-6;

/// A task placed with a worker by one optimizer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Receiving worker.
    pub worker_id: WorkerId,
    /// Assigned task.
    pub task_id: TaskId,
}

impl Assignment {
    /// Creates an assignment pair.
    #[must_use]
    pub const fn new(worker_id: WorkerId, task_id: TaskId) -> Self {
        Self { worker_id, task_id }
    }
}

/// Partition of a snapshot's tasks into assignments and queued tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentPlan {
    snapshot_taken_at: DateTime<Utc>,
    assignments: Vec<Assignment>,
    queued: Vec<TaskId>,
    objective: f64,
}

/// A way in which a plan breaks the partition, capacity or eligibility rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanViolation {
    /// The plan mentions a task that is not in the snapshot.
    #[error("plan references unknown task {0}")]
    UnknownTask(TaskId),
    /// The plan mentions a worker that is not in the snapshot.
    #[error("plan references unknown worker {0}")]
    UnknownWorker(WorkerId),
    /// A snapshot task is neither assigned nor queued.
    #[error("task {0} is neither assigned nor queued")]
    TaskNotCovered(TaskId),
    /// A task appears more than once across assignments and queue.
    #[error("task {0} is placed more than once")]
    TaskCoveredTwice(TaskId),
    /// A task is assigned to a worker with another specialization.
    #[error("task {task_id} is not eligible for worker {worker_id}")]
    Ineligible {
        /// Offending task.
        task_id: TaskId,
        /// Receiving worker.
        worker_id: WorkerId,
    },
    /// A worker's committed plus newly assigned hours exceed the ceiling.
    #[error("worker {worker_id} would carry {load} against a ceiling of {max_hours}")]
    CapacityExceeded {
        /// Overloaded worker.
        worker_id: WorkerId,
        /// Workload plus assigned durations.
        load: Hours,
        /// Capacity ceiling.
        max_hours: Hours,
    },
}

impl AssignmentPlan {
    /// Creates a plan.
    #[must_use]
    pub const fn new(
        snapshot_taken_at: DateTime<Utc>,
        assignments: Vec<Assignment>,
        queued: Vec<TaskId>,
        objective: f64,
    ) -> Self {
        Self {
            snapshot_taken_at,
            assignments,
            queued,
            objective,
        }
    }

    /// Returns an empty plan for a snapshot with nothing to schedule.
    #[must_use]
    pub const fn empty(snapshot_taken_at: DateTime<Utc>) -> Self {
        Self::new(snapshot_taken_at, Vec::new(), Vec::new(), 0.0)
    }

    /// Replaces the recorded objective value.
    #[must_use]
    pub fn with_objective(mut self, objective: f64) -> Self {
        self.objective = objective;
        self
    }

    /// Returns the instant of the snapshot this plan was computed from.
    #[must_use]
    pub const fn snapshot_taken_at(&self) -> DateTime<Utc> {
        self.snapshot_taken_at
    }

    /// Returns the `(worker, task)` pairs.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Returns the tasks left in the queue.
    #[must_use]
    pub fn queued(&self) -> &[TaskId] {
        &self.queued
    }

    /// Returns the objective value of this plan.
    #[must_use]
    pub const fn objective(&self) -> f64 {
        self.objective
    }

    /// Returns whether the plan neither assigns nor queues anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.queued.is_empty()
    }

    /// Returns the worker a task was assigned to, if any.
    #[must_use]
    pub fn worker_for(&self, task_id: TaskId) -> Option<WorkerId> {
        self.assignments
            .iter()
            .find(|pair| pair.task_id == task_id)
            .map(|pair| pair.worker_id)
    }

    /// Returns whether a task was queued.
    #[must_use]
    pub fn is_queued(&self, task_id: TaskId) -> bool {
        self.queued.contains(&task_id)
    }

    /// Distinct workers receiving at least one task.
    #[must_use]
    pub fn receiving_workers(&self) -> BTreeSet<WorkerId> {
        self.assignments.iter().map(|pair| pair.worker_id).collect()
    }

    /// Checks the plan against the snapshot it was computed from.
    ///
    /// # Errors
    ///
    /// Returns the first [`PlanViolation`] found.
    pub fn validate_against(&self, snapshot: &SchedulingSnapshot) -> Result<(), PlanViolation> {
        let mut placed = BTreeSet::new();
        let mut added: BTreeMap<WorkerId, Hours> = BTreeMap::new();

        for pair in &self.assignments {
            let task = snapshot
                .tasks()
                .get(&pair.task_id)
                .ok_or(PlanViolation::UnknownTask(pair.task_id))?;
            let worker = snapshot
                .workers()
                .get(&pair.worker_id)
                .ok_or(PlanViolation::UnknownWorker(pair.worker_id))?;
            if !placed.insert(pair.task_id) {
                return Err(PlanViolation::TaskCoveredTwice(pair.task_id));
            }
            if !worker.is_eligible_for(task) {
                return Err(PlanViolation::Ineligible {
                    task_id: pair.task_id,
                    worker_id: pair.worker_id,
                });
            }
            let entry = added.entry(pair.worker_id).or_default();
            *entry = *entry + task.duration;
        }

        for task_id in &self.queued {
            if !snapshot.tasks().contains_key(task_id) {
                return Err(PlanViolation::UnknownTask(*task_id));
            }
            if !placed.insert(*task_id) {
                return Err(PlanViolation::TaskCoveredTwice(*task_id));
            }
        }

        if let Some(missing) = snapshot.tasks().keys().find(|id| !placed.contains(*id)) {
            return Err(PlanViolation::TaskNotCovered(*missing));
        }

        for (worker_id, extra) in added {
            let Some(worker) = snapshot.workers().get(&worker_id) else {
                return Err(PlanViolation::UnknownWorker(worker_id));
            };
            let load = worker.workload + extra;
            if load.value() > worker.max_hours.value() + CAPACITY_TOLERANCE {
                return Err(PlanViolation::CapacityExceeded {
                    worker_id,
                    load,
                    max_hours: worker.max_hours,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for AssignmentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tasks assigned, {} tasks queued",
            self.assignments.len(),
            self.queued.len()
        )
    }
}
