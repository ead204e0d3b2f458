//! Error types for scheduling domain validation and parsing.

use super::{Specialization, TaskId, TaskStatus, WorkerId};
use thiserror::Error;

/// Errors returned while constructing or transitioning domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchedulingDomainError {
    /// An hour quantity was negative, NaN or infinite.
    #[error("invalid hour value {0}, expected a finite non-negative number")]
    InvalidHours(f64),

    /// A task duration was zero.
    #[error("task duration must be positive, got {0}")]
    NonPositiveDuration(f64),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The worker name is empty after trimming.
    #[error("worker name must not be empty")]
    EmptyWorkerName,

    /// The requested transition is not permitted from the current status.
    #[error("cannot {action} task {task_id} while it is {from}")]
    InvalidTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Status at the time of the attempt.
        from: TaskStatus,
        /// Attempted action.
        action: &'static str,
    },

    /// A task is being placed with a worker of a different specialization.
    #[error("task {task_id} requires {required}, worker {worker_id} is {offered}")]
    SpecializationMismatch {
        /// Task being placed.
        task_id: TaskId,
        /// Worker receiving the task.
        worker_id: WorkerId,
        /// Specialization the task requires.
        required: Specialization,
        /// Specialization the worker has.
        offered: Specialization,
    },

    /// The worker is inactive and cannot receive work.
    #[error("worker {0} is inactive")]
    InactiveWorker(WorkerId),

    /// Persisted task fields break the assignment invariant.
    #[error("task {0} has an inconsistent status, assignment and queue combination")]
    InconsistentTaskState(TaskId),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing specialization labels.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown specialization: {0}")]
pub struct ParseSpecializationError(pub String);
