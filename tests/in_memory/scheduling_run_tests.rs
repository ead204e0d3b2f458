//! In-memory integration tests for scheduling runs through the public API.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use shopfloor::config::SchedulerConfig;
use shopfloor::scheduling::{
    adapters::{memory::InMemoryShopRepository, milp::MilpAssignmentOptimizer},
    domain::{Hours, TaskStatus},
    ports::ShopRepository,
    services::{
        CreateTaskRequest, RegisterWorkerRequest, SchedulingService, TaskDeskService,
        WorkerRosterService, WorkloadTracker,
    },
};

use super::helpers::assert_workloads_consistent;

struct Shop {
    repo: Arc<InMemoryShopRepository>,
    scheduling: SchedulingService<InMemoryShopRepository, MilpAssignmentOptimizer, DefaultClock>,
    desk: TaskDeskService<InMemoryShopRepository, DefaultClock>,
    roster: WorkerRosterService<InMemoryShopRepository, DefaultClock>,
}

fn shop_with(config: SchedulerConfig) -> Shop {
    let repo = Arc::new(InMemoryShopRepository::new());
    let clock = Arc::new(DefaultClock);
    Shop {
        scheduling: SchedulingService::new(
            Arc::clone(&repo),
            Arc::new(MilpAssignmentOptimizer::new(config.cost_model())),
            Arc::clone(&clock),
        ),
        desk: TaskDeskService::new(Arc::clone(&repo), Arc::clone(&clock)),
        roster: WorkerRosterService::new(Arc::clone(&repo), clock),
        repo,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn every_task_is_assigned_or_queued_and_capacity_holds() -> eyre::Result<()> {
    let shop = shop_with(SchedulerConfig::default());
    let crew = [
        ("Ada", "mechanic", 8.0),
        ("Bo", "mechanic", 6.0),
        ("Cy", "electrician", 5.0),
        ("Dee", "painter", 4.0),
    ];
    for (name, specialization, max_hours) in crew {
        shop.roster
            .register(RegisterWorkerRequest::new(name, specialization, max_hours))
            .await?;
    }
    let backlog = [
        ("Brakes", "mechanic", 3.0, 2),
        ("Clutch", "mechanic", 5.0, 9),
        ("Exhaust", "mechanic", 2.5, 0),
        ("Timing belt", "mechanic", 4.0, 30),
        ("Battery", "electrician", 1.0, 1),
        ("Loom", "electrician", 4.5, 14),
        ("Bumper", "painter", 3.5, 4),
        ("Alignment", "tire_service", 1.0, 0),
    ];
    for (title, specialization, duration, age) in backlog {
        shop.desk
            .create_task(
                CreateTaskRequest::new(title, specialization, duration)
                    .with_issued_at(Utc::now() - Duration::days(age)),
            )
            .await?;
    }

    let outcome = shop.scheduling.run().await?;

    eyre::ensure!(outcome.plan.assignments().len() + outcome.plan.queued().len() == backlog.len());
    eyre::ensure!(outcome.report.assigned == outcome.plan.assignments().len());
    for worker in shop.repo.list_workers().await? {
        eyre::ensure!(
            worker.workload() <= worker.max_hours(),
            "{} is over capacity",
            worker.full_name()
        );
    }
    for pair in outcome.plan.assignments() {
        let task = shop
            .repo
            .find_task(pair.task_id)
            .await?
            .ok_or_else(|| eyre::eyre!("assigned task missing"))?;
        let worker = shop
            .repo
            .find_worker(pair.worker_id)
            .await?
            .ok_or_else(|| eyre::eyre!("assigned worker missing"))?;
        eyre::ensure!(task.required_specialization() == worker.specialization());
        eyre::ensure!(task.status() == TaskStatus::InProgress);
    }
    assert_workloads_consistent(shop.repo.as_ref()).await
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_shop_run_is_a_no_op() -> eyre::Result<()> {
    let shop = shop_with(SchedulerConfig::default());

    let outcome = shop.scheduling.run().await?;

    eyre::ensure!(outcome.plan.is_empty());
    eyre::ensure!(outcome.report.settled.is_empty());
    eyre::ensure!(outcome.plan.to_string() == "0 tasks assigned, 0 tasks queued");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn workloads_stay_consistent_across_edits_and_reruns() -> eyre::Result<()> {
    let shop = shop_with(SchedulerConfig::default());
    let ada = shop
        .roster
        .register(RegisterWorkerRequest::new("Ada", "body_work", 10.0))
        .await?;
    let bo = shop
        .roster
        .register(RegisterWorkerRequest::new("Bo", "body_work", 6.0))
        .await?;
    for (title, duration) in [("Door", 4.0), ("Wing", 3.0), ("Sill", 5.0), ("Roof", 6.0)] {
        shop.desk
            .create_task(CreateTaskRequest::new(title, "body work", duration))
            .await?;
    }

    shop.scheduling.run().await?;
    assert_workloads_consistent(shop.repo.as_ref()).await?;

    let busy = shop.desk.list_for_worker(ada.id()).await?;
    if let Some(first) = busy.first() {
        shop.desk.assign(first.id(), bo.id()).await?;
    }
    assert_workloads_consistent(shop.repo.as_ref()).await?;

    for running in shop.desk.list_for_worker(bo.id()).await? {
        shop.desk.complete(running.id()).await?;
    }
    assert_workloads_consistent(shop.repo.as_ref()).await?;

    shop.scheduling.run().await?;
    assert_workloads_consistent(shop.repo.as_ref()).await?;

    let settled = WorkloadTracker::new(Arc::clone(&shop.repo)).recompute_all().await?;
    for (worker_id, workload) in settled {
        let stored = shop
            .repo
            .find_worker(worker_id)
            .await?
            .ok_or_else(|| eyre::eyre!("worker missing after sweep"))?;
        eyre::ensure!(stored.workload() == workload);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cheap_queue_penalty_leaves_work_unassigned() -> eyre::Result<()> {
    let config = SchedulerConfig::from_json_str(r#"{"queue_penalty": 0.5}"#)?;
    let shop = shop_with(config);
    shop.roster
        .register(RegisterWorkerRequest::new("Ada", "diagnostics", 8.0))
        .await?;
    shop.desk
        .create_task(CreateTaskRequest::new("Scan", "diagnostics", 1.0))
        .await?;

    let outcome = shop.scheduling.run().await?;

    eyre::ensure!(outcome.plan.assignments().is_empty());
    eyre::ensure!(shop.desk.list_queued().await?.len() == 1);
    for worker in shop.repo.list_workers().await? {
        eyre::ensure!(worker.workload() == Hours::ZERO);
    }
    Ok(())
}
