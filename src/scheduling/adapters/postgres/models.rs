//! Diesel row models for scheduling persistence.

use super::schema::{tasks, workers};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Required specialization label.
    pub required_specialization: String,
    /// Duration in hours.
    pub duration_hours: f64,
    /// Lifecycle status.
    pub status: String,
    /// Current assignee.
    pub assigned_worker_id: Option<uuid::Uuid>,
    /// Queue flag.
    pub in_queue: bool,
    /// Archive flag.
    pub archived: bool,
    /// Issue timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskRecord {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Required specialization label.
    pub required_specialization: String,
    /// Duration in hours.
    pub duration_hours: f64,
    /// Lifecycle status.
    pub status: String,
    /// Current assignee.
    pub assigned_worker_id: Option<uuid::Uuid>,
    /// Queue flag.
    pub in_queue: bool,
    /// Archive flag.
    pub archived: bool,
    /// Issue timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for worker records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkerRow {
    /// Worker identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub full_name: String,
    /// Specialization label.
    pub specialization: String,
    /// Capacity ceiling.
    pub max_hours: f64,
    /// Cached workload.
    pub workload: f64,
    /// Activity flag.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for worker records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workers)]
pub struct NewWorkerRow {
    /// Worker identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub full_name: String,
    /// Specialization label.
    pub specialization: String,
    /// Capacity ceiling.
    pub max_hours: f64,
    /// Initial workload, settled right after insert.
    pub workload: f64,
    /// Activity flag.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Profile changes for worker records. Excludes the workload cache.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = workers)]
pub struct WorkerProfileChangeset {
    /// Display name.
    pub full_name: String,
    /// Specialization label.
    pub specialization: String,
    /// Capacity ceiling.
    pub max_hours: f64,
    /// Activity flag.
    pub active: bool,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
