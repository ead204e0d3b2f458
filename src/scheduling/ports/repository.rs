//! Repository port for tasks, workers, snapshots and plan commits.

use crate::scheduling::domain::{
    AssignmentPlan, Hours, SchedulingDomainError, SchedulingSnapshot, Task, TaskId, Worker,
    WorkerId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Result type for shop repository operations.
pub type ShopRepositoryResult<T> = Result<T, ShopRepositoryError>;

/// Outcome of a successful plan commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReport {
    /// Number of tasks moved to in progress.
    pub assigned: usize,
    /// Number of tasks marked as queued.
    pub queued: usize,
    /// Workers whose workload was recomputed, with the settled value.
    pub settled: Vec<(WorkerId, Hours)>,
}

/// Persistence contract for the scheduling context.
///
/// Every write that can change a task's assignee, status or duration settles
/// the workload of the affected workers in the same atomic unit, so the
/// cached workload never drifts from the task set.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`ShopRepositoryError::DuplicateTask`] when the ID exists.
    async fn store_task(&self, task: &Task) -> ShopRepositoryResult<()>;

    /// Persists changes to an existing task and settles the workload of its
    /// previous and current assignee.
    ///
    /// # Errors
    ///
    /// Returns [`ShopRepositoryError::TaskNotFound`] when the task does not
    /// exist.
    async fn update_task(&self, task: &Task) -> ShopRepositoryResult<()>;

    /// Deletes a task and settles the workload of its assignee.
    ///
    /// # Errors
    ///
    /// Returns [`ShopRepositoryError::TaskNotFound`] when the task does not
    /// exist.
    async fn delete_task(&self, id: TaskId) -> ShopRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_task(&self, id: TaskId) -> ShopRepositoryResult<Option<Task>>;

    /// Returns unarchived new tasks that the latest run left in the queue.
    async fn list_queued_tasks(&self) -> ShopRepositoryResult<Vec<Task>>;

    /// Returns the in-progress tasks assigned to a worker.
    async fn list_tasks_for_worker(&self, worker_id: WorkerId) -> ShopRepositoryResult<Vec<Task>>;

    /// Stores a new worker.
    ///
    /// # Errors
    ///
    /// Returns [`ShopRepositoryError::DuplicateWorker`] when the ID exists.
    async fn store_worker(&self, worker: &Worker) -> ShopRepositoryResult<()>;

    /// Persists changes to a worker's profile.
    ///
    /// The stored workload is re-derived rather than taken from `worker`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopRepositoryError::WorkerNotFound`] when the worker does
    /// not exist.
    async fn update_worker(&self, worker: &Worker) -> ShopRepositoryResult<()>;

    /// Finds a worker by identifier.
    async fn find_worker(&self, id: WorkerId) -> ShopRepositoryResult<Option<Worker>>;

    /// Returns every worker, active or not.
    async fn list_workers(&self) -> ShopRepositoryResult<Vec<Worker>>;

    /// Reads schedulable tasks and active workers in one consistent view.
    ///
    /// Worker workloads are derived from the task set at read time.
    async fn load_snapshot(&self, as_of: DateTime<Utc>) -> ShopRepositoryResult<SchedulingSnapshot>;

    /// Applies a plan atomically: assigned tasks go in progress, queued tasks
    /// are flagged, and every touched worker is settled.
    ///
    /// # Errors
    ///
    /// Any error leaves every task and worker as it was.
    async fn commit_plan(
        &self,
        plan: &AssignmentPlan,
        committed_at: DateTime<Utc>,
    ) -> ShopRepositoryResult<CommitReport>;

    /// Recomputes and persists a worker's workload from the task set.
    ///
    /// # Errors
    ///
    /// Returns [`ShopRepositoryError::WorkerNotFound`] when the worker does
    /// not exist.
    async fn recompute_workload(&self, worker_id: WorkerId) -> ShopRepositoryResult<Hours>;
}

/// Errors returned by shop repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ShopRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A worker with the same identifier already exists.
    #[error("duplicate worker identifier: {0}")]
    DuplicateWorker(WorkerId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The worker was not found.
    #[error("worker not found: {0}")]
    WorkerNotFound(WorkerId),

    /// A stored record or a requested mutation broke a domain rule.
    #[error(transparent)]
    Domain(#[from] SchedulingDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ShopRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
