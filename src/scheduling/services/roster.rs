//! Worker registration and profile edits.

use crate::scheduling::{
    domain::{
        Hours, ParseSpecializationError, SchedulingDomainError, Specialization, Worker, WorkerId,
    },
    ports::{ShopRepository, ShopRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for registering a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterWorkerRequest {
    full_name: String,
    specialization: String,
    max_hours: f64,
}

impl RegisterWorkerRequest {
    /// Creates a request with the required worker fields.
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        specialization: impl Into<String>,
        max_hours: f64,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            specialization: specialization.into(),
            max_hours,
        }
    }
}

/// Service-level errors for roster operations.
#[derive(Debug, Clone, Error)]
pub enum WorkerRosterError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] SchedulingDomainError),
    /// The specialization label is not recognised.
    #[error(transparent)]
    Specialization(#[from] ParseSpecializationError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ShopRepositoryError),
}

/// Result type for roster operations.
pub type WorkerRosterResult<T> = Result<T, WorkerRosterError>;

/// Worker registration, capacity and availability management.
///
/// Profile edits never touch committed assignments; a lowered capacity or
/// changed specialization only affects later scheduling runs.
#[derive(Clone)]
pub struct WorkerRosterService<R, C>
where
    R: ShopRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> WorkerRosterService<R, C>
where
    R: ShopRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new roster service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new active worker.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerRosterError`] when a field fails validation or the
    /// repository rejects persistence.
    pub async fn register(&self, request: RegisterWorkerRequest) -> WorkerRosterResult<Worker> {
        let RegisterWorkerRequest {
            full_name,
            specialization,
            max_hours,
        } = request;

        let worker = Worker::new(
            full_name,
            Specialization::try_from(specialization.as_str())?,
            Hours::new(max_hours)?,
            &*self.clock,
        )?;
        self.repository.store_worker(&worker).await?;
        info!(worker_id = %worker.id(), specialization = %worker.specialization(), "worker registered");
        Ok(worker)
    }

    /// Changes a worker's capacity ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerRosterError`] when the value is invalid or the worker
    /// does not exist.
    pub async fn update_capacity(
        &self,
        worker_id: WorkerId,
        max_hours: f64,
    ) -> WorkerRosterResult<Worker> {
        let ceiling = Hours::new(max_hours)?;
        let mut worker = self.worker_or_error(worker_id).await?;
        worker.set_max_hours(ceiling, &*self.clock);
        self.store(&worker).await
    }

    /// Changes a worker's specialization.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerRosterError`] when the label is unknown or the worker
    /// does not exist.
    pub async fn change_specialization(
        &self,
        worker_id: WorkerId,
        specialization: &str,
    ) -> WorkerRosterResult<Worker> {
        let parsed = Specialization::try_from(specialization)?;
        let mut worker = self.worker_or_error(worker_id).await?;
        worker.set_specialization(parsed, &*self.clock);
        self.store(&worker).await
    }

    /// Excludes a worker from future scheduling runs.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerRosterError::Repository`] when the worker does not
    /// exist or persistence fails.
    pub async fn deactivate(&self, worker_id: WorkerId) -> WorkerRosterResult<Worker> {
        let mut worker = self.worker_or_error(worker_id).await?;
        worker.set_active(false, &*self.clock);
        self.store(&worker).await
    }

    /// Makes a worker available to scheduling runs again.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerRosterError::Repository`] when the worker does not
    /// exist or persistence fails.
    pub async fn activate(&self, worker_id: WorkerId) -> WorkerRosterResult<Worker> {
        let mut worker = self.worker_or_error(worker_id).await?;
        worker.set_active(true, &*self.clock);
        self.store(&worker).await
    }

    /// Finds a worker by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerRosterError::Repository`] when persistence lookup
    /// fails.
    pub async fn find(&self, worker_id: WorkerId) -> WorkerRosterResult<Option<Worker>> {
        Ok(self.repository.find_worker(worker_id).await?)
    }

    /// Lists active workers.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerRosterError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_active(&self) -> WorkerRosterResult<Vec<Worker>> {
        let workers = self.repository.list_workers().await?;
        Ok(workers.into_iter().filter(Worker::active).collect())
    }

    async fn store(&self, worker: &Worker) -> WorkerRosterResult<Worker> {
        self.repository.update_worker(worker).await?;
        // The stored workload is re-derived; read it back.
        self.worker_or_error(worker.id()).await
    }

    async fn worker_or_error(&self, worker_id: WorkerId) -> WorkerRosterResult<Worker> {
        self.repository
            .find_worker(worker_id)
            .await?
            .ok_or_else(|| ShopRepositoryError::WorkerNotFound(worker_id).into())
    }
}
