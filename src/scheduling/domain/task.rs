//! Task aggregate root and its status lifecycle.

use super::{
    Hours, ParseTaskStatusError, SchedulingDomainError, Specialization, TaskId, Worker, WorkerId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Awaiting assignment, either fresh or left in the queue.
    New,
    /// Assigned to a worker and counted in that worker's workload.
    InProgress,
    /// Finished work.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
///
/// `assigned_worker` is set exactly when the status is
/// [`TaskStatus::InProgress`], and `in_queue` can only be set on a
/// [`TaskStatus::New`] task. Every transition preserves both rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    required_specialization: Specialization,
    duration: Hours,
    status: TaskStatus,
    assigned_worker: Option<WorkerId>,
    in_queue: bool,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskData {
    /// Short description of the work.
    pub title: String,
    /// Specialization a worker must have to take the task.
    pub required_specialization: Specialization,
    /// Effort required.
    pub duration: Hours,
    /// Issue date; defaults to the clock time when absent.
    pub issued_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted required specialization.
    pub required_specialization: Specialization,
    /// Persisted duration.
    pub duration: Hours,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted assignee, if any.
    pub assigned_worker: Option<WorkerId>,
    /// Persisted queue flag.
    pub in_queue: bool,
    /// Persisted archive flag.
    pub archived: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Field edits applied by [`Task::revise`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRevision {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement duration.
    pub duration: Option<Hours>,
    /// Replacement specialization.
    pub required_specialization: Option<Specialization>,
}

impl Task {
    /// Creates a new, unassigned task outside the queue.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::EmptyTaskTitle`] for a blank title and
    /// [`SchedulingDomainError::NonPositiveDuration`] for a zero duration.
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Result<Self, SchedulingDomainError> {
        let title = normalize_title(&data.title)?;
        ensure_positive(data.duration)?;
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            title,
            required_specialization: data.required_specialization,
            duration: data.duration,
            status: TaskStatus::New,
            assigned_worker: None,
            in_queue: false,
            archived: false,
            created_at: data.issued_at.unwrap_or(timestamp),
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InconsistentTaskState`] when the
    /// stored status, assignee and queue flag contradict each other.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, SchedulingDomainError> {
        let consistent = match data.status {
            TaskStatus::InProgress => data.assigned_worker.is_some() && !data.in_queue,
            TaskStatus::New => data.assigned_worker.is_none(),
            TaskStatus::Completed => data.assigned_worker.is_none() && !data.in_queue,
        };
        if !consistent {
            return Err(SchedulingDomainError::InconsistentTaskState(data.id));
        }

        Ok(Self {
            id: data.id,
            title: data.title,
            required_specialization: data.required_specialization,
            duration: data.duration,
            status: data.status,
            assigned_worker: data.assigned_worker,
            in_queue: data.in_queue,
            archived: data.archived,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the specialization a worker needs for this task.
    #[must_use]
    pub const fn required_specialization(&self) -> Specialization {
        self.required_specialization
    }

    /// Returns the effort required.
    #[must_use]
    pub const fn duration(&self) -> Hours {
        self.duration
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the current assignee. Only in-progress tasks have one.
    #[must_use]
    pub const fn assigned_worker(&self) -> Option<WorkerId> {
        self.assigned_worker
    }

    /// Returns whether the latest scheduling run left this task unassigned.
    #[must_use]
    pub const fn in_queue(&self) -> bool {
        self.in_queue
    }

    /// Returns whether the task is archived.
    #[must_use]
    pub const fn archived(&self) -> bool {
        self.archived
    }

    /// Returns the issue date used for aging.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the next scheduling run should consider this task.
    #[must_use]
    pub const fn is_schedulable(&self) -> bool {
        matches!(self.status, TaskStatus::New) && !self.archived
    }

    /// Returns whether this task counts towards `worker_id`'s workload.
    #[must_use]
    pub fn counts_towards(&self, worker_id: WorkerId) -> bool {
        matches!(self.status, TaskStatus::InProgress) && self.assigned_worker == Some(worker_id)
    }

    /// Assigns a new task to `worker` and moves it to in progress.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidTransition`] unless the task
    /// is new and unarchived, and the eligibility errors of
    /// [`Task::ensure_eligible`].
    pub fn assign_to(
        &mut self,
        worker: &Worker,
        at: DateTime<Utc>,
    ) -> Result<(), SchedulingDomainError> {
        if !self.is_schedulable() {
            return Err(self.invalid("assign"));
        }
        self.ensure_eligible(worker)?;
        self.status = TaskStatus::InProgress;
        self.assigned_worker = Some(worker.id());
        self.in_queue = false;
        self.updated_at = at;
        Ok(())
    }

    /// Moves an in-progress task to another worker.
    ///
    /// Returns the previous assignee.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidTransition`] unless the task
    /// is in progress, and the eligibility errors of [`Task::ensure_eligible`].
    pub fn reassign_to(
        &mut self,
        worker: &Worker,
        at: DateTime<Utc>,
    ) -> Result<Option<WorkerId>, SchedulingDomainError> {
        if self.status != TaskStatus::InProgress {
            return Err(self.invalid("reassign"));
        }
        self.ensure_eligible(worker)?;
        let previous = self.assigned_worker.replace(worker.id());
        self.updated_at = at;
        Ok(previous)
    }

    /// Leaves a new task unassigned and marks it as queued.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidTransition`] unless the task
    /// is new and unarchived.
    pub fn send_to_queue(&mut self, at: DateTime<Utc>) -> Result<(), SchedulingDomainError> {
        if !self.is_schedulable() {
            return Err(self.invalid("queue"));
        }
        self.assigned_worker = None;
        self.in_queue = true;
        self.updated_at = at;
        Ok(())
    }

    /// Returns an in-progress task to the pool of new work.
    ///
    /// Returns the worker it was taken from.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidTransition`] unless the task
    /// is in progress.
    pub fn release(&mut self, at: DateTime<Utc>) -> Result<Option<WorkerId>, SchedulingDomainError> {
        if self.status != TaskStatus::InProgress {
            return Err(self.invalid("release"));
        }
        self.status = TaskStatus::New;
        self.in_queue = false;
        self.updated_at = at;
        Ok(self.assigned_worker.take())
    }

    /// Completes an in-progress task and archives it.
    ///
    /// Returns the worker that held it.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidTransition`] unless the task
    /// is in progress.
    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<Option<WorkerId>, SchedulingDomainError> {
        if self.status != TaskStatus::InProgress {
            return Err(self.invalid("complete"));
        }
        self.status = TaskStatus::Completed;
        self.archived = true;
        self.updated_at = at;
        Ok(self.assigned_worker.take())
    }

    /// Archives a task that is not being worked on.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidTransition`] for in-progress
    /// tasks.
    pub fn archive(&mut self, at: DateTime<Utc>) -> Result<(), SchedulingDomainError> {
        if self.status == TaskStatus::InProgress {
            return Err(self.invalid("archive"));
        }
        self.archived = true;
        self.in_queue = false;
        self.updated_at = at;
        Ok(())
    }

    /// Applies field edits.
    ///
    /// An in-progress task keeps its worker, so a specialization change is
    /// only accepted when the caller passes that worker and it still matches.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidTransition`] for completed
    /// tasks, title and duration validation errors, and
    /// [`SchedulingDomainError::SpecializationMismatch`] when an in-progress
    /// task would no longer match its worker.
    pub fn revise(
        &mut self,
        revision: TaskRevision,
        assignee: Option<&Worker>,
        at: DateTime<Utc>,
    ) -> Result<(), SchedulingDomainError> {
        if self.status == TaskStatus::Completed {
            return Err(self.invalid("revise"));
        }
        let title = revision
            .title
            .as_deref()
            .map(normalize_title)
            .transpose()?
            .unwrap_or_else(|| self.title.clone());
        let duration = revision.duration.unwrap_or(self.duration);
        ensure_positive(duration)?;
        let required = revision
            .required_specialization
            .unwrap_or(self.required_specialization);

        let specialization_changed = required != self.required_specialization;
        if let Some(worker_id) = self.assigned_worker.filter(|_| specialization_changed) {
            let offered = assignee
                .filter(|worker| worker.id() == worker_id)
                .map(Worker::specialization);
            if offered != Some(required) {
                return Err(SchedulingDomainError::SpecializationMismatch {
                    task_id: self.id,
                    worker_id,
                    required,
                    offered: offered.unwrap_or(self.required_specialization),
                });
            }
        }

        self.title = title;
        self.duration = duration;
        self.required_specialization = required;
        self.updated_at = at;
        Ok(())
    }

    /// Checks that `worker` may take this task.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InactiveWorker`] or
    /// [`SchedulingDomainError::SpecializationMismatch`].
    pub fn ensure_eligible(&self, worker: &Worker) -> Result<(), SchedulingDomainError> {
        if !worker.active() {
            return Err(SchedulingDomainError::InactiveWorker(worker.id()));
        }
        if worker.specialization() != self.required_specialization {
            return Err(SchedulingDomainError::SpecializationMismatch {
                task_id: self.id,
                worker_id: worker.id(),
                required: self.required_specialization,
                offered: worker.specialization(),
            });
        }
        Ok(())
    }

    const fn invalid(&self, action: &'static str) -> SchedulingDomainError {
        SchedulingDomainError::InvalidTransition {
            task_id: self.id,
            from: self.status,
            action,
        }
    }
}

fn normalize_title(raw: &str) -> Result<String, SchedulingDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SchedulingDomainError::EmptyTaskTitle);
    }
    Ok(trimmed.to_owned())
}

fn ensure_positive(duration: Hours) -> Result<(), SchedulingDomainError> {
    if duration == Hours::ZERO {
        return Err(SchedulingDomainError::NonPositiveDuration(duration.value()));
    }
    Ok(())
}
