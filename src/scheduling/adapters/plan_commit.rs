//! Applies an assignment plan to loaded aggregates.

use crate::scheduling::{
    domain::{AssignmentPlan, Task, TaskId, Worker, WorkerId},
    ports::{ShopRepositoryError, ShopRepositoryResult},
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

/// Transitions every task named by `plan` and returns the workers whose
/// workload must be settled afterwards.
///
/// Nothing is written to storage here; the caller persists `tasks` and
/// settles the returned workers inside its own atomic unit, discarding the
/// changes if this returns an error.
pub(super) fn apply_plan(
    plan: &AssignmentPlan,
    tasks: &mut HashMap<TaskId, Task>,
    workers: &HashMap<WorkerId, Worker>,
    at: DateTime<Utc>,
) -> ShopRepositoryResult<BTreeSet<WorkerId>> {
    let mut touched = BTreeSet::new();

    for pair in plan.assignments() {
        let worker = workers
            .get(&pair.worker_id)
            .ok_or(ShopRepositoryError::WorkerNotFound(pair.worker_id))?;
        let task = tasks
            .get_mut(&pair.task_id)
            .ok_or(ShopRepositoryError::TaskNotFound(pair.task_id))?;
        touched.extend(task.assigned_worker());
        task.assign_to(worker, at)?;
        touched.insert(pair.worker_id);
    }

    for task_id in plan.queued() {
        let task = tasks
            .get_mut(task_id)
            .ok_or(ShopRepositoryError::TaskNotFound(*task_id))?;
        touched.extend(task.assigned_worker());
        task.send_to_queue(at)?;
    }

    Ok(touched)
}

/// Task identifiers named anywhere in `plan`.
pub(super) fn planned_task_ids(plan: &AssignmentPlan) -> Vec<TaskId> {
    plan.assignments()
        .iter()
        .map(|pair| pair.task_id)
        .chain(plan.queued().iter().copied())
        .collect()
}
