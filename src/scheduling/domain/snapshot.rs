//! Immutable input to a single scheduling run.

use super::{Hours, Specialization, Task, TaskId, Worker, WorkerId, derive_workload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A task as seen by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskCandidate {
    /// Task identifier.
    pub id: TaskId,
    /// Specialization a worker must have.
    pub required_specialization: Specialization,
    /// Effort required.
    pub duration: Hours,
    /// Issue date, used for aging.
    pub created_at: DateTime<Utc>,
}

impl From<&Task> for TaskCandidate {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            required_specialization: task.required_specialization(),
            duration: task.duration(),
            created_at: task.created_at(),
        }
    }
}

/// A worker as seen by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkerCandidate {
    /// Worker identifier.
    pub id: WorkerId,
    /// Specialization the worker offers.
    pub specialization: Specialization,
    /// Capacity ceiling.
    pub max_hours: Hours,
    /// Committed workload at snapshot time.
    pub workload: Hours,
}

impl WorkerCandidate {
    /// Builds a candidate whose workload is derived from `tasks`.
    pub fn derived<'a>(worker: &Worker, tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        Self {
            id: worker.id(),
            specialization: worker.specialization(),
            max_hours: worker.max_hours(),
            workload: derive_workload(worker.id(), tasks),
        }
    }

    /// Hours still available before the ceiling is reached.
    #[must_use]
    pub fn free_capacity(&self) -> Hours {
        self.max_hours.saturating_sub(self.workload)
    }

    /// Returns whether this worker may take `task`, ignoring capacity.
    #[must_use]
    pub fn is_eligible_for(&self, task: &TaskCandidate) -> bool {
        self.specialization == task.required_specialization
    }
}

/// Tasks and workers captured at one instant.
///
/// Ordered maps keep optimizer model construction, and therefore its result,
/// reproducible for a given snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingSnapshot {
    taken_at: DateTime<Utc>,
    tasks: BTreeMap<TaskId, TaskCandidate>,
    workers: BTreeMap<WorkerId, WorkerCandidate>,
}

impl SchedulingSnapshot {
    /// Creates a snapshot from candidate collections.
    pub fn new(
        taken_at: DateTime<Utc>,
        tasks: impl IntoIterator<Item = TaskCandidate>,
        workers: impl IntoIterator<Item = WorkerCandidate>,
    ) -> Self {
        Self {
            taken_at,
            tasks: tasks.into_iter().map(|task| (task.id, task)).collect(),
            workers: workers.into_iter().map(|worker| (worker.id, worker)).collect(),
        }
    }

    /// Builds a snapshot from full aggregates.
    ///
    /// Only schedulable tasks and active workers are kept, and each worker's
    /// workload is derived from `all_tasks` rather than read from its cache.
    #[must_use]
    pub fn capture(taken_at: DateTime<Utc>, all_tasks: &[Task], workers: &[Worker]) -> Self {
        let tasks = all_tasks
            .iter()
            .filter(|task| task.is_schedulable())
            .map(TaskCandidate::from);
        let candidates = workers
            .iter()
            .filter(|worker| worker.active())
            .map(|worker| WorkerCandidate::derived(worker, all_tasks));
        Self::new(taken_at, tasks, candidates)
    }

    /// Returns the capture instant, used as "today" for aging.
    #[must_use]
    pub const fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Returns the candidate tasks keyed by identifier.
    #[must_use]
    pub const fn tasks(&self) -> &BTreeMap<TaskId, TaskCandidate> {
        &self.tasks
    }

    /// Returns the candidate workers keyed by identifier.
    #[must_use]
    pub const fn workers(&self) -> &BTreeMap<WorkerId, WorkerCandidate> {
        &self.workers
    }

    /// Returns whether there is nothing to schedule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
