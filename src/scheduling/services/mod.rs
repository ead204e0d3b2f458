//! Application services for the scheduling context.

mod roster;
mod scheduling;
mod task_desk;
mod workload;

pub use roster::{
    RegisterWorkerRequest, WorkerRosterError, WorkerRosterResult, WorkerRosterService,
};
pub use scheduling::{
    SchedulingOutcome, SchedulingRunError, SchedulingRunResult, SchedulingService,
};
pub use task_desk::{
    CreateTaskRequest, ReviseTaskRequest, TaskDeskError, TaskDeskResult, TaskDeskService,
};
pub use workload::{WorkloadTracker, WorkloadTrackerError, WorkloadTrackerResult};
