//! Scheduling-eligible worker aggregate.

use super::{Hours, SchedulingDomainError, Specialization, WorkerId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A worker who can receive tasks from the optimizer.
///
/// `workload` is a cache of the in-progress hours assigned to this worker.
/// It is written only by the settling path in the repository adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    id: WorkerId,
    full_name: String,
    specialization: Specialization,
    max_hours: Hours,
    workload: Hours,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted worker.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedWorkerData {
    /// Persisted worker identifier.
    pub id: WorkerId,
    /// Persisted display name.
    pub full_name: String,
    /// Persisted specialization.
    pub specialization: Specialization,
    /// Persisted capacity ceiling.
    pub max_hours: Hours,
    /// Persisted workload cache.
    pub workload: Hours,
    /// Persisted activity flag.
    pub active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Worker {
    /// Registers a new active worker with no workload.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::EmptyWorkerName`] for a blank name.
    pub fn new(
        full_name: impl Into<String>,
        specialization: Specialization,
        max_hours: Hours,
        clock: &impl Clock,
    ) -> Result<Self, SchedulingDomainError> {
        let raw = full_name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SchedulingDomainError::EmptyWorkerName);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: WorkerId::new(),
            full_name: trimmed.to_owned(),
            specialization,
            max_hours,
            workload: Hours::ZERO,
            active: true,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a worker from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkerData) -> Self {
        Self {
            id: data.id,
            full_name: data.full_name,
            specialization: data.specialization,
            max_hours: data.max_hours,
            workload: data.workload,
            active: data.active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the worker identifier.
    #[must_use]
    pub const fn id(&self) -> WorkerId {
        self.id
    }

    /// Returns the worker's display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the worker's specialization.
    #[must_use]
    pub const fn specialization(&self) -> Specialization {
        self.specialization
    }

    /// Returns the capacity ceiling.
    #[must_use]
    pub const fn max_hours(&self) -> Hours {
        self.max_hours
    }

    /// Returns the cached committed workload.
    #[must_use]
    pub const fn workload(&self) -> Hours {
        self.workload
    }

    /// Returns whether the worker takes part in scheduling.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Changes the capacity ceiling.
    pub fn set_max_hours(&mut self, max_hours: Hours, clock: &impl Clock) {
        self.max_hours = max_hours;
        self.updated_at = clock.utc();
    }

    /// Changes the specialization.
    pub fn set_specialization(&mut self, specialization: Specialization, clock: &impl Clock) {
        self.specialization = specialization;
        self.updated_at = clock.utc();
    }

    /// Marks the worker active or inactive.
    pub fn set_active(&mut self, active: bool, clock: &impl Clock) {
        self.active = active;
        self.updated_at = clock.utc();
    }

    /// Overwrites the workload cache with a freshly derived aggregate.
    pub(crate) const fn settle_workload(&mut self, workload: Hours) {
        self.workload = workload;
    }
}
