//! In-memory shop repository for tests and embedded use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::super::plan_commit::apply_plan;
use crate::scheduling::{
    domain::{
        AssignmentPlan, Hours, SchedulingSnapshot, Task, TaskId, TaskStatus, Worker, WorkerId,
        derive_workload,
    },
    ports::{CommitReport, ShopRepository, ShopRepositoryError, ShopRepositoryResult},
};

/// Thread-safe in-memory repository.
///
/// Plan commits are staged on a copy of the state and swapped in only when
/// every mutation succeeded.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShopRepository {
    state: Arc<RwLock<InMemoryShopState>>,
}

#[derive(Debug, Clone, Default)]
struct InMemoryShopState {
    tasks: HashMap<TaskId, Task>,
    workers: HashMap<WorkerId, Worker>,
}

impl InMemoryShopRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ShopRepositoryResult<RwLockReadGuard<'_, InMemoryShopState>> {
        self.state.read().map_err(|err| {
            ShopRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ShopRepositoryResult<RwLockWriteGuard<'_, InMemoryShopState>> {
        self.state.write().map_err(|err| {
            ShopRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryShopState {
    /// Re-derives and stores a worker's workload; `None` if the worker is gone.
    fn settle(&mut self, worker_id: WorkerId) -> Option<Hours> {
        let workload = derive_workload(worker_id, self.tasks.values());
        let worker = self.workers.get_mut(&worker_id)?;
        worker.settle_workload(workload);
        Some(workload)
    }

    fn ensure_assignee_exists(&self, task: &Task) -> ShopRepositoryResult<()> {
        match task.assigned_worker() {
            Some(worker_id) if !self.workers.contains_key(&worker_id) => {
                Err(ShopRepositoryError::WorkerNotFound(worker_id))
            }
            _ => Ok(()),
        }
    }
}

fn sorted_by_creation(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by_key(|task| (task.created_at(), task.id()));
    tasks
}

#[async_trait]
impl ShopRepository for InMemoryShopRepository {
    async fn store_task(&self, task: &Task) -> ShopRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(ShopRepositoryError::DuplicateTask(task.id()));
        }
        state.ensure_assignee_exists(task)?;
        state.tasks.insert(task.id(), task.clone());
        if let Some(worker_id) = task.assigned_worker() {
            state.settle(worker_id);
        }
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> ShopRepositoryResult<()> {
        let mut state = self.write()?;
        let previous = state
            .tasks
            .get(&task.id())
            .ok_or(ShopRepositoryError::TaskNotFound(task.id()))?
            .assigned_worker();
        state.ensure_assignee_exists(task)?;

        state.tasks.insert(task.id(), task.clone());
        for worker_id in previous.into_iter().chain(task.assigned_worker()) {
            state.settle(worker_id);
        }
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> ShopRepositoryResult<()> {
        let mut state = self.write()?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(ShopRepositoryError::TaskNotFound(id))?;
        if let Some(worker_id) = removed.assigned_worker() {
            state.settle(worker_id);
        }
        Ok(())
    }

    async fn find_task(&self, id: TaskId) -> ShopRepositoryResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn list_queued_tasks(&self) -> ShopRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let queued = state
            .tasks
            .values()
            .filter(|task| task.in_queue() && task.is_schedulable())
            .cloned()
            .collect();
        Ok(sorted_by_creation(queued))
    }

    async fn list_tasks_for_worker(&self, worker_id: WorkerId) -> ShopRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let assigned = state
            .tasks
            .values()
            .filter(|task| task.status() == TaskStatus::InProgress)
            .filter(|task| task.assigned_worker() == Some(worker_id))
            .cloned()
            .collect();
        Ok(sorted_by_creation(assigned))
    }

    async fn store_worker(&self, worker: &Worker) -> ShopRepositoryResult<()> {
        let mut state = self.write()?;
        if state.workers.contains_key(&worker.id()) {
            return Err(ShopRepositoryError::DuplicateWorker(worker.id()));
        }
        state.workers.insert(worker.id(), worker.clone());
        state.settle(worker.id());
        Ok(())
    }

    async fn update_worker(&self, worker: &Worker) -> ShopRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.workers.contains_key(&worker.id()) {
            return Err(ShopRepositoryError::WorkerNotFound(worker.id()));
        }
        state.workers.insert(worker.id(), worker.clone());
        state.settle(worker.id());
        Ok(())
    }

    async fn find_worker(&self, id: WorkerId) -> ShopRepositoryResult<Option<Worker>> {
        Ok(self.read()?.workers.get(&id).cloned())
    }

    async fn list_workers(&self) -> ShopRepositoryResult<Vec<Worker>> {
        let state = self.read()?;
        let mut workers: Vec<Worker> = state.workers.values().cloned().collect();
        workers.sort_by(|left, right| {
            left.full_name()
                .cmp(right.full_name())
                .then(left.id().cmp(&right.id()))
        });
        Ok(workers)
    }

    async fn load_snapshot(&self, as_of: DateTime<Utc>) -> ShopRepositoryResult<SchedulingSnapshot> {
        let state = self.read()?;
        let tasks: Vec<Task> = state.tasks.values().cloned().collect();
        let workers: Vec<Worker> = state.workers.values().cloned().collect();
        Ok(SchedulingSnapshot::capture(as_of, &tasks, &workers))
    }

    async fn commit_plan(
        &self,
        plan: &AssignmentPlan,
        committed_at: DateTime<Utc>,
    ) -> ShopRepositoryResult<CommitReport> {
        let mut state = self.write()?;
        let mut staged = state.clone();

        let touched = apply_plan(plan, &mut staged.tasks, &staged.workers, committed_at)?;
        let settled = touched
            .into_iter()
            .filter_map(|worker_id| staged.settle(worker_id).map(|hours| (worker_id, hours)))
            .collect();

        *state = staged;
        Ok(CommitReport {
            assigned: plan.assignments().len(),
            queued: plan.queued().len(),
            settled,
        })
    }

    async fn recompute_workload(&self, worker_id: WorkerId) -> ShopRepositoryResult<Hours> {
        let mut state = self.write()?;
        state
            .settle(worker_id)
            .ok_or(ShopRepositoryError::WorkerNotFound(worker_id))
    }
}
