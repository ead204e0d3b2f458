//! Manual task edits outside scheduling runs.
//!
//! Every mutation is persisted through [`ShopRepository::update_task`] or
//! [`ShopRepository::delete_task`], which settle the affected workers'
//! workloads, so no call site here touches a workload directly.

use crate::scheduling::{
    domain::{
        Hours, NewTaskData, ParseSpecializationError, SchedulingDomainError, Specialization, Task,
        TaskId, TaskRevision, TaskStatus, Worker, WorkerId,
    },
    ports::{ShopRepository, ShopRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    title: String,
    specialization: String,
    duration_hours: f64,
    issued_at: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        specialization: impl Into<String>,
        duration_hours: f64,
    ) -> Self {
        Self {
            title: title.into(),
            specialization: specialization.into(),
            duration_hours,
            issued_at: None,
        }
    }

    /// Sets the issue date used for aging. Defaults to now.
    #[must_use]
    pub const fn with_issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }
}

/// Request payload for editing task fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviseTaskRequest {
    task_id: TaskId,
    title: Option<String>,
    specialization: Option<String>,
    duration_hours: Option<f64>,
}

impl ReviseTaskRequest {
    /// Creates an empty revision for `task_id`.
    #[must_use]
    pub const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            title: None,
            specialization: None,
            duration_hours: None,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the required specialization.
    #[must_use]
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    /// Replaces the duration.
    #[must_use]
    pub const fn with_duration_hours(mut self, duration_hours: f64) -> Self {
        self.duration_hours = Some(duration_hours);
        self
    }
}

/// Service-level errors for manual task edits.
#[derive(Debug, Clone, Error)]
pub enum TaskDeskError {
    /// Domain validation or a lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] SchedulingDomainError),
    /// The specialization label is not recognised.
    #[error(transparent)]
    Specialization(#[from] ParseSpecializationError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ShopRepositoryError),
}

/// Result type for task desk operations.
pub type TaskDeskResult<T> = Result<T, TaskDeskError>;

/// Task creation and manual lifecycle edits.
#[derive(Clone)]
pub struct TaskDeskService<R, C>
where
    R: ShopRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskDeskService<R, C>
where
    R: ShopRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task desk service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates and stores a new unassigned task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeskError`] when a field fails validation or the
    /// repository rejects persistence.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskDeskResult<Task> {
        let CreateTaskRequest {
            title,
            specialization,
            duration_hours,
            issued_at,
        } = request;

        let task = Task::new(
            NewTaskData {
                title,
                required_specialization: Specialization::try_from(specialization.as_str())?,
                duration: Hours::duration(duration_hours)?,
                issued_at,
            },
            &*self.clock,
        )?;
        self.repository.store_task(&task).await?;
        info!(task_id = %task.id(), specialization = %task.required_specialization(), "task created");
        Ok(task)
    }

    /// Assigns a task to a worker by hand, or moves it to another worker if
    /// it is already in progress.
    ///
    /// Capacity is not checked; the worker must be active and match the
    /// task's specialization.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeskError::Repository`] when the task or worker does not
    /// exist, and [`TaskDeskError::Domain`] for ineligible workers or
    /// completed tasks.
    pub async fn assign(&self, task_id: TaskId, worker_id: WorkerId) -> TaskDeskResult<Task> {
        let mut task = self.task_or_error(task_id).await?;
        let worker = self.worker_or_error(worker_id).await?;
        let now = self.clock.utc();

        if task.status() == TaskStatus::InProgress {
            task.reassign_to(&worker, now)?;
        } else {
            task.assign_to(&worker, now)?;
        }
        self.repository.update_task(&task).await?;
        info!(%task_id, %worker_id, "task assigned manually");
        Ok(task)
    }

    /// Takes an in-progress task back from its worker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeskError`] when the task is missing or not in progress.
    pub async fn release(&self, task_id: TaskId) -> TaskDeskResult<Task> {
        let mut task = self.task_or_error(task_id).await?;
        task.release(self.clock.utc())?;
        self.repository.update_task(&task).await?;
        Ok(task)
    }

    /// Completes an in-progress task, which also archives it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeskError`] when the task is missing or not in progress.
    pub async fn complete(&self, task_id: TaskId) -> TaskDeskResult<Task> {
        let mut task = self.task_or_error(task_id).await?;
        task.complete(self.clock.utc())?;
        self.repository.update_task(&task).await?;
        info!(%task_id, "task completed");
        Ok(task)
    }

    /// Archives a task that is not in progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeskError`] when the task is missing or in progress.
    pub async fn archive(&self, task_id: TaskId) -> TaskDeskResult<Task> {
        let mut task = self.task_or_error(task_id).await?;
        task.archive(self.clock.utc())?;
        self.repository.update_task(&task).await?;
        Ok(task)
    }

    /// Edits task fields.
    ///
    /// A duration change on an in-progress task is reflected in its worker's
    /// workload when the update is stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeskError`] when the task is missing, a field fails
    /// validation, or the task's worker no longer matches.
    pub async fn revise(&self, request: ReviseTaskRequest) -> TaskDeskResult<Task> {
        let ReviseTaskRequest {
            task_id,
            title,
            specialization,
            duration_hours,
        } = request;

        let revision = TaskRevision {
            title,
            duration: duration_hours.map(Hours::duration).transpose()?,
            required_specialization: specialization
                .as_deref()
                .map(Specialization::try_from)
                .transpose()?,
        };

        let mut task = self.task_or_error(task_id).await?;
        let assignee = match task.assigned_worker() {
            Some(worker_id) => self.repository.find_worker(worker_id).await?,
            None => None,
        };
        task.revise(revision, assignee.as_ref(), self.clock.utc())?;
        self.repository.update_task(&task).await?;
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeskError::Repository`] when the task does not exist or
    /// persistence fails.
    pub async fn delete(&self, task_id: TaskId) -> TaskDeskResult<()> {
        self.repository.delete_task(task_id).await?;
        info!(%task_id, "task deleted");
        Ok(())
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeskError::Repository`] when persistence lookup fails.
    pub async fn find(&self, task_id: TaskId) -> TaskDeskResult<Option<Task>> {
        Ok(self.repository.find_task(task_id).await?)
    }

    /// Lists the tasks the latest scheduling run left in the queue.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeskError::Repository`] when persistence lookup fails.
    pub async fn list_queued(&self) -> TaskDeskResult<Vec<Task>> {
        Ok(self.repository.list_queued_tasks().await?)
    }

    /// Lists the in-progress tasks held by a worker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeskError::Repository`] when persistence lookup fails.
    pub async fn list_for_worker(&self, worker_id: WorkerId) -> TaskDeskResult<Vec<Task>> {
        Ok(self.repository.list_tasks_for_worker(worker_id).await?)
    }

    async fn task_or_error(&self, task_id: TaskId) -> TaskDeskResult<Task> {
        self.repository
            .find_task(task_id)
            .await?
            .ok_or_else(|| ShopRepositoryError::TaskNotFound(task_id).into())
    }

    async fn worker_or_error(&self, worker_id: WorkerId) -> TaskDeskResult<Worker> {
        self.repository
            .find_worker(worker_id)
            .await?
            .ok_or_else(|| ShopRepositoryError::WorkerNotFound(worker_id).into())
    }
}
