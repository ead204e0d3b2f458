//! Domain model for service-shop task scheduling.
//!
//! Tasks, workers and the immutable snapshot consumed by the optimizer live
//! here, together with the cost model and the workload aggregate. Nothing in
//! this module touches storage or the solver.

mod cost;
mod error;
mod hours;
mod ids;
mod plan;
mod snapshot;
mod specialization;
mod task;
mod worker;
mod workload;

pub use cost::CostModel;
pub use error::{ParseSpecializationError, ParseTaskStatusError, SchedulingDomainError};
pub use hours::Hours;
pub use ids::{TaskId, WorkerId};
pub use plan::{Assignment, AssignmentPlan, PlanViolation};
pub use snapshot::{SchedulingSnapshot, TaskCandidate, WorkerCandidate};
pub use specialization::Specialization;
pub use task::{NewTaskData, PersistedTaskData, Task, TaskRevision, TaskStatus};
pub use worker::{PersistedWorkerData, Worker};
pub use workload::derive_workload;
