//! On-demand workload settling.

use crate::scheduling::{
    domain::{Hours, WorkerId},
    ports::{ShopRepository, ShopRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors returned by [`WorkloadTracker`].
#[derive(Debug, Clone, Error)]
pub enum WorkloadTrackerError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ShopRepositoryError),
}

/// Result type for workload tracker operations.
pub type WorkloadTrackerResult<T> = Result<T, WorkloadTrackerError>;

/// Recomputes cached worker workloads from the task set.
///
/// Repository writes already settle the workers they touch; this service is
/// for explicit repair after out-of-band changes to storage.
#[derive(Clone)]
pub struct WorkloadTracker<R>
where
    R: ShopRepository,
{
    repository: Arc<R>,
}

impl<R> WorkloadTracker<R>
where
    R: ShopRepository,
{
    /// Creates a new workload tracker.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Recomputes and stores one worker's workload.
    ///
    /// Idempotent: calling it twice without intervening task changes stores
    /// the same value.
    ///
    /// # Errors
    ///
    /// Returns [`WorkloadTrackerError::Repository`] when the worker does not
    /// exist or persistence fails.
    pub async fn recompute(&self, worker_id: WorkerId) -> WorkloadTrackerResult<Hours> {
        let workload = self.repository.recompute_workload(worker_id).await?;
        debug!(%worker_id, %workload, "workload settled");
        Ok(workload)
    }

    /// Recomputes every worker's workload, active or not.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first repository failure. Workers settled
    /// before it keep their new value.
    pub async fn recompute_all(&self) -> WorkloadTrackerResult<Vec<(WorkerId, Hours)>> {
        let workers = self.repository.list_workers().await?;
        let mut settled = Vec::with_capacity(workers.len());
        for worker in workers {
            let workload = self.repository.recompute_workload(worker.id()).await?;
            settled.push((worker.id(), workload));
        }
        info!(workers = settled.len(), "workload sweep finished");
        Ok(settled)
    }
}
