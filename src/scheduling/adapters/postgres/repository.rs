//! `PostgreSQL` repository implementation for scheduling storage.

use super::{
    models::{NewWorkerRow, TaskRecord, TaskRow, WorkerProfileChangeset, WorkerRow},
    schema::{tasks, workers},
};
use crate::config::DatabaseConfig;
use crate::scheduling::{
    adapters::plan_commit::{apply_plan, planned_task_ids},
    domain::{
        AssignmentPlan, Hours, PersistedTaskData, PersistedWorkerData, SchedulingSnapshot,
        Specialization, Task, TaskCandidate, TaskId, TaskStatus, Worker, WorkerCandidate,
        WorkerId,
    },
    ports::{CommitReport, ShopRepository, ShopRepositoryError, ShopRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sum;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::{HashMap, HashSet};

/// `PostgreSQL` connection pool type used by scheduling adapters.
pub type ShopPgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool from database settings.
///
/// # Errors
///
/// Returns [`ShopRepositoryError::Persistence`] when the pool cannot be
/// created.
pub fn build_pool(config: &DatabaseConfig) -> ShopRepositoryResult<ShopPgPool> {
    let manager = ConnectionManager::<PgConnection>::new(config.url());
    Pool::builder()
        .max_size(config.pool_size())
        .build(manager)
        .map_err(ShopRepositoryError::persistence)
}

/// `PostgreSQL`-backed shop repository.
///
/// All database work runs on the blocking thread pool. Writes that touch
/// assignments settle worker workloads inside the same transaction.
#[derive(Debug, Clone)]
pub struct PostgresShopRepository {
    pool: ShopPgPool,
}

impl From<DieselError> for ShopRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresShopRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ShopPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ShopRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ShopRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ShopRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ShopRepositoryError::persistence)?
    }
}

#[async_trait]
impl ShopRepository for PostgresShopRepository {
    async fn store_task(&self, task: &Task) -> ShopRepositoryResult<()> {
        let task_id = task.id();
        let record = to_task_record(task);
        let assignee = task.assigned_worker();

        self.run_blocking(move |connection| {
            connection.transaction::<_, ShopRepositoryError, _>(|tx| {
                ensure_worker_exists(tx, assignee)?;
                diesel::insert_into(tasks::table)
                    .values(&record)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ShopRepositoryError::DuplicateTask(task_id)
                        }
                        _ => ShopRepositoryError::persistence(err),
                    })?;
                settle_all(tx, assignee)?;
                Ok(())
            })
        })
        .await
    }

    async fn update_task(&self, task: &Task) -> ShopRepositoryResult<()> {
        let task_id = task.id();
        let record = to_task_record(task);
        let assignee = task.assigned_worker();

        self.run_blocking(move |connection| {
            connection.transaction::<_, ShopRepositoryError, _>(|tx| {
                let previous = tasks::table
                    .find(task_id.into_inner())
                    .select(tasks::assigned_worker_id)
                    .for_update()
                    .first::<Option<uuid::Uuid>>(tx)
                    .optional()?
                    .ok_or(ShopRepositoryError::TaskNotFound(task_id))?
                    .map(WorkerId::from_uuid);
                ensure_worker_exists(tx, assignee)?;

                diesel::update(tasks::table.find(task_id.into_inner()))
                    .set(&record)
                    .execute(tx)?;
                settle_all(tx, previous.into_iter().chain(assignee))?;
                Ok(())
            })
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> ShopRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, ShopRepositoryError, _>(|tx| {
                let previous = diesel::delete(tasks::table.find(id.into_inner()))
                    .returning(tasks::assigned_worker_id)
                    .get_result::<Option<uuid::Uuid>>(tx)
                    .optional()?
                    .ok_or(ShopRepositoryError::TaskNotFound(id))?
                    .map(WorkerId::from_uuid);
                settle_all(tx, previous)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> ShopRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_queued_tasks(&self) -> ShopRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::in_queue.eq(true))
                .filter(tasks::status.eq(TaskStatus::New.as_str()))
                .filter(tasks::archived.eq(false))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_tasks_for_worker(&self, worker_id: WorkerId) -> ShopRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assigned_worker_id.eq(worker_id.into_inner()))
                .filter(tasks::status.eq(TaskStatus::InProgress.as_str()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn store_worker(&self, worker: &Worker) -> ShopRepositoryResult<()> {
        let worker_id = worker.id();
        let row = to_new_worker_row(worker);

        self.run_blocking(move |connection| {
            connection.transaction::<_, ShopRepositoryError, _>(|tx| {
                diesel::insert_into(workers::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ShopRepositoryError::DuplicateWorker(worker_id)
                        }
                        _ => ShopRepositoryError::persistence(err),
                    })?;
                settle(tx, worker_id)?;
                Ok(())
            })
        })
        .await
    }

    async fn update_worker(&self, worker: &Worker) -> ShopRepositoryResult<()> {
        let worker_id = worker.id();
        let changes = WorkerProfileChangeset {
            full_name: worker.full_name().to_owned(),
            specialization: worker.specialization().as_str().to_owned(),
            max_hours: worker.max_hours().value(),
            active: worker.active(),
            updated_at: worker.updated_at(),
        };

        self.run_blocking(move |connection| {
            connection.transaction::<_, ShopRepositoryError, _>(|tx| {
                let updated = diesel::update(workers::table.find(worker_id.into_inner()))
                    .set(&changes)
                    .execute(tx)?;
                if updated == 0 {
                    return Err(ShopRepositoryError::WorkerNotFound(worker_id));
                }
                settle(tx, worker_id)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_worker(&self, id: WorkerId) -> ShopRepositoryResult<Option<Worker>> {
        self.run_blocking(move |connection| {
            let row = workers::table
                .find(id.into_inner())
                .select(WorkerRow::as_select())
                .first::<WorkerRow>(connection)
                .optional()?;
            row.map(row_to_worker).transpose()
        })
        .await
    }

    async fn list_workers(&self) -> ShopRepositoryResult<Vec<Worker>> {
        self.run_blocking(move |connection| {
            let rows = workers::table
                .order((workers::full_name.asc(), workers::id.asc()))
                .select(WorkerRow::as_select())
                .load::<WorkerRow>(connection)?;
            rows.into_iter().map(row_to_worker).collect()
        })
        .await
    }

    async fn load_snapshot(&self, as_of: DateTime<Utc>) -> ShopRepositoryResult<SchedulingSnapshot> {
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .repeatable_read()
                .read_only()
                .run::<_, ShopRepositoryError, _>(|tx| {
                    let task_rows = tasks::table
                        .filter(tasks::status.eq(TaskStatus::New.as_str()))
                        .filter(tasks::archived.eq(false))
                        .select(TaskRow::as_select())
                        .load::<TaskRow>(tx)?;
                    let worker_rows = workers::table
                        .filter(workers::active.eq(true))
                        .select(WorkerRow::as_select())
                        .load::<WorkerRow>(tx)?;
                    let committed = committed_hours_by_worker(tx)?;

                    let candidates = task_rows
                        .into_iter()
                        .map(|row| row_to_task(row).map(|task| TaskCandidate::from(&task)))
                        .collect::<ShopRepositoryResult<Vec<_>>>()?;
                    let worker_candidates = worker_rows
                        .into_iter()
                        .map(|row| -> ShopRepositoryResult<WorkerCandidate> {
                            let worker = row_to_worker(row)?;
                            let workload = committed
                                .get(&worker.id())
                                .copied()
                                .unwrap_or(Hours::ZERO);
                            Ok(WorkerCandidate {
                                id: worker.id(),
                                specialization: worker.specialization(),
                                max_hours: worker.max_hours(),
                                workload,
                            })
                        })
                        .collect::<ShopRepositoryResult<Vec<_>>>()?;

                    Ok(SchedulingSnapshot::new(
                        as_of,
                        candidates,
                        worker_candidates,
                    ))
                })
        })
        .await
    }

    async fn commit_plan(
        &self,
        plan: &AssignmentPlan,
        committed_at: DateTime<Utc>,
    ) -> ShopRepositoryResult<CommitReport> {
        let plan = plan.clone();

        self.run_blocking(move |connection| {
            connection.transaction::<_, ShopRepositoryError, _>(|tx| {
                let task_ids: Vec<uuid::Uuid> = planned_task_ids(&plan)
                    .into_iter()
                    .map(TaskId::into_inner)
                    .collect();
                let worker_ids: Vec<uuid::Uuid> = plan
                    .receiving_workers()
                    .into_iter()
                    .map(WorkerId::into_inner)
                    .collect();

                let mut loaded = tasks::table
                    .filter(tasks::id.eq_any(&task_ids))
                    .select(TaskRow::as_select())
                    .for_update()
                    .load::<TaskRow>(tx)?
                    .into_iter()
                    .map(|row| row_to_task(row).map(|task| (task.id(), task)))
                    .collect::<ShopRepositoryResult<HashMap<_, _>>>()?;
                let receivers = workers::table
                    .filter(workers::id.eq_any(&worker_ids))
                    .select(WorkerRow::as_select())
                    .for_update()
                    .load::<WorkerRow>(tx)?
                    .into_iter()
                    .map(|row| row_to_worker(row).map(|worker| (worker.id(), worker)))
                    .collect::<ShopRepositoryResult<HashMap<_, _>>>()?;

                let touched = apply_plan(&plan, &mut loaded, &receivers, committed_at)?;

                for task in loaded.values() {
                    diesel::update(tasks::table.find(task.id().into_inner()))
                        .set(&to_task_record(task))
                        .execute(tx)?;
                }

                let mut settled = Vec::with_capacity(touched.len());
                for worker_id in touched {
                    if let Some(hours) = settle(tx, worker_id)? {
                        settled.push((worker_id, hours));
                    }
                }

                Ok(CommitReport {
                    assigned: plan.assignments().len(),
                    queued: plan.queued().len(),
                    settled,
                })
            })
        })
        .await
    }

    async fn recompute_workload(&self, worker_id: WorkerId) -> ShopRepositoryResult<Hours> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, ShopRepositoryError, _>(|tx| {
                settle(tx, worker_id)?.ok_or(ShopRepositoryError::WorkerNotFound(worker_id))
            })
        })
        .await
    }
}

/// Sums in-progress hours for one worker and writes them to the cache.
///
/// Returns `None` when the worker row does not exist.
fn settle(connection: &mut PgConnection, worker_id: WorkerId) -> ShopRepositoryResult<Option<Hours>> {
    let total = tasks::table
        .filter(tasks::assigned_worker_id.eq(worker_id.into_inner()))
        .filter(tasks::status.eq(TaskStatus::InProgress.as_str()))
        .select(sum(tasks::duration_hours))
        .first::<Option<f64>>(connection)?
        .unwrap_or(0.0);
    let workload = Hours::new(total)?;

    let updated = diesel::update(workers::table.find(worker_id.into_inner()))
        .set(workers::workload.eq(workload.value()))
        .execute(connection)?;
    Ok((updated > 0).then_some(workload))
}

fn settle_all(
    connection: &mut PgConnection,
    worker_ids: impl IntoIterator<Item = WorkerId>,
) -> ShopRepositoryResult<()> {
    let mut seen = HashSet::new();
    for worker_id in worker_ids {
        if seen.insert(worker_id) {
            settle(connection, worker_id)?;
        }
    }
    Ok(())
}

fn ensure_worker_exists(
    connection: &mut PgConnection,
    worker_id: Option<WorkerId>,
) -> ShopRepositoryResult<()> {
    let Some(id) = worker_id else {
        return Ok(());
    };
    let found = workers::table
        .find(id.into_inner())
        .select(workers::id)
        .first::<uuid::Uuid>(connection)
        .optional()?;
    found
        .map(|_| ())
        .ok_or(ShopRepositoryError::WorkerNotFound(id))
}

fn committed_hours_by_worker(
    connection: &mut PgConnection,
) -> ShopRepositoryResult<HashMap<WorkerId, Hours>> {
    let totals = tasks::table
        .filter(tasks::status.eq(TaskStatus::InProgress.as_str()))
        .filter(tasks::assigned_worker_id.is_not_null())
        .group_by(tasks::assigned_worker_id)
        .select((tasks::assigned_worker_id, sum(tasks::duration_hours)))
        .load::<(Option<uuid::Uuid>, Option<f64>)>(connection)?;

    totals
        .into_iter()
        .filter_map(|(worker, total)| worker.map(|id| (id, total.unwrap_or(0.0))))
        .map(|(id, total)| {
            Hours::new(total)
                .map(|hours| (WorkerId::from_uuid(id), hours))
                .map_err(ShopRepositoryError::from)
        })
        .collect()
}

fn to_task_record(task: &Task) -> TaskRecord {
    TaskRecord {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        required_specialization: task.required_specialization().as_str().to_owned(),
        duration_hours: task.duration().value(),
        status: task.status().as_str().to_owned(),
        assigned_worker_id: task.assigned_worker().map(WorkerId::into_inner),
        in_queue: task.in_queue(),
        archived: task.archived(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_new_worker_row(worker: &Worker) -> NewWorkerRow {
    NewWorkerRow {
        id: worker.id().into_inner(),
        full_name: worker.full_name().to_owned(),
        specialization: worker.specialization().as_str().to_owned(),
        max_hours: worker.max_hours().value(),
        workload: worker.workload().value(),
        active: worker.active(),
        created_at: worker.created_at(),
        updated_at: worker.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> ShopRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        required_specialization,
        duration_hours,
        status,
        assigned_worker_id,
        in_queue,
        archived,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        required_specialization: Specialization::try_from(required_specialization.as_str())
            .map_err(ShopRepositoryError::persistence)?,
        duration: Hours::duration(duration_hours)?,
        status: TaskStatus::try_from(status.as_str()).map_err(ShopRepositoryError::persistence)?,
        assigned_worker: assigned_worker_id.map(WorkerId::from_uuid),
        in_queue,
        archived,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data)?)
}

fn row_to_worker(row: WorkerRow) -> ShopRepositoryResult<Worker> {
    let WorkerRow {
        id,
        full_name,
        specialization,
        max_hours,
        workload,
        active,
        created_at,
        updated_at,
    } = row;

    Ok(Worker::from_persisted(PersistedWorkerData {
        id: WorkerId::from_uuid(id),
        full_name,
        specialization: Specialization::try_from(specialization.as_str())
            .map_err(ShopRepositoryError::persistence)?,
        max_hours: Hours::new(max_hours)?,
        workload: Hours::new(workload)?,
        active,
        created_at,
        updated_at,
    }))
}
