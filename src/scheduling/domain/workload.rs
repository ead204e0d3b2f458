//! Workload aggregate over the task set.

use super::{Hours, Task, WorkerId};

/// Sums the durations of in-progress tasks assigned to `worker_id`.
///
/// This is the single definition of a worker's workload; the cached value on
/// [`super::Worker`] is always overwritten with it.
pub fn derive_workload<'a>(worker_id: WorkerId, tasks: impl IntoIterator<Item = &'a Task>) -> Hours {
    tasks
        .into_iter()
        .filter(|task| task.counts_towards(worker_id))
        .map(Task::duration)
        .sum()
}
