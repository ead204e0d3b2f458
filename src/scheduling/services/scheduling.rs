//! Scheduling run orchestration: snapshot, solve, commit.
//!
//! A run is all-or-nothing. The snapshot is read in one consistent view, the
//! solver works on that immutable value off the async runtime, and the plan
//! is committed in one atomic repository call. A failure at any step leaves
//! storage untouched and is reported under the step that failed.

use crate::scheduling::{
    domain::AssignmentPlan,
    ports::{
        AssignmentOptimizer, CommitReport, OptimizerError, ShopRepository, ShopRepositoryError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Failure categories of a scheduling run.
#[derive(Debug, Clone, Error)]
pub enum SchedulingRunError {
    /// The snapshot could not be read. Nothing was mutated.
    #[error("snapshot failed: {0}")]
    Snapshot(#[source] ShopRepositoryError),

    /// The optimizer could not produce a plan. Nothing was mutated.
    #[error("solve failed: {0}")]
    Solve(#[source] OptimizerError),

    /// The plan could not be committed. The commit was rolled back.
    #[error("commit failed: {0}")]
    Commit(#[source] ShopRepositoryError),
}

/// Result type for scheduling runs.
pub type SchedulingRunResult<T> = Result<T, SchedulingRunError>;

/// Result of a committed scheduling run.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingOutcome {
    /// The plan that was committed.
    pub plan: AssignmentPlan,
    /// What the commit changed.
    pub report: CommitReport,
}

/// Runs the snapshot, solve and commit sequence.
///
/// Runs on one service instance are serialized; a second caller waits for
/// the first run to finish and then takes a fresh snapshot.
pub struct SchedulingService<R, O, C>
where
    R: ShopRepository,
    O: AssignmentOptimizer + 'static,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    optimizer: Arc<O>,
    clock: Arc<C>,
    in_flight: Mutex<()>,
}

impl<R, O, C> SchedulingService<R, O, C>
where
    R: ShopRepository,
    O: AssignmentOptimizer + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a new scheduling service.
    #[must_use]
    pub fn new(repository: Arc<R>, optimizer: Arc<O>, clock: Arc<C>) -> Self {
        Self {
            repository,
            optimizer,
            clock,
            in_flight: Mutex::new(()),
        }
    }

    /// Computes and commits a plan for the current schedulable tasks.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingRunError::Snapshot`], [`SchedulingRunError::Solve`]
    /// or [`SchedulingRunError::Commit`] for the step that failed. No step is
    /// retried.
    pub async fn run(&self) -> SchedulingRunResult<SchedulingOutcome> {
        let _guard = self.in_flight.lock().await;
        let plan = self.plan_now().await?;

        let report = self
            .repository
            .commit_plan(&plan, self.clock.utc())
            .await
            .map_err(|err| {
                warn!(error = %err, "scheduling commit rolled back");
                SchedulingRunError::Commit(err)
            })?;

        info!(
            assigned = report.assigned,
            queued = report.queued,
            settled_workers = report.settled.len(),
            objective = plan.objective(),
            "scheduling run committed: {plan}"
        );
        Ok(SchedulingOutcome { plan, report })
    }

    /// Computes a plan without committing it.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingRunError::Snapshot`] or
    /// [`SchedulingRunError::Solve`].
    pub async fn preview(&self) -> SchedulingRunResult<AssignmentPlan> {
        let _guard = self.in_flight.lock().await;
        self.plan_now().await
    }

    async fn plan_now(&self) -> SchedulingRunResult<AssignmentPlan> {
        let snapshot = self
            .repository
            .load_snapshot(self.clock.utc())
            .await
            .map_err(|err| {
                warn!(error = %err, "scheduling snapshot failed");
                SchedulingRunError::Snapshot(err)
            })?;
        debug!(
            tasks = snapshot.tasks().len(),
            workers = snapshot.workers().len(),
            taken_at = %snapshot.taken_at(),
            "scheduling snapshot loaded"
        );

        let optimizer = Arc::clone(&self.optimizer);
        let solved = tokio::task::spawn_blocking(move || optimizer.optimize(&snapshot))
            .await
            .map_err(|err| OptimizerError::Interrupted(err.to_string()))
            .and_then(|result| result);

        solved.map_err(|err| {
            warn!(error = %err, "scheduling solve failed");
            SchedulingRunError::Solve(err)
        })
    }
}
