//! Then steps for scheduling run BDD scenarios.

use super::world::{SchedulingWorld, run_async};
use rstest_bdd_macros::then;
use shopfloor::scheduling::{
    domain::{Hours, Task, TaskStatus},
    ports::ShopRepository,
};

fn stored_task(world: &SchedulingWorld, title: &str) -> Result<Task, eyre::Report> {
    let task_id = world.task_id(title)?;
    run_async(world.repository.find_task(task_id))?
        .ok_or_else(|| eyre::eyre!("task {title} missing from repository"))
}

#[then(r#"the run summary is "{summary}""#)]
fn run_summary_is(world: &SchedulingWorld, summary: String) -> Result<(), eyre::Report> {
    let outcome = world
        .last_run
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no scheduling run recorded"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("scheduling run failed: {err}"))?;
    eyre::ensure!(
        outcome.plan.to_string() == summary,
        "expected summary {summary:?}, got {:?}",
        outcome.plan.to_string()
    );
    Ok(())
}

#[then(r#"task "{title}" is in progress with "{name}""#)]
fn task_in_progress_with(
    world: &SchedulingWorld,
    title: String,
    name: String,
) -> Result<(), eyre::Report> {
    let stored = stored_task(world, &title)?;
    let worker_id = world.worker_id(&name)?;
    eyre::ensure!(
        stored.status() == TaskStatus::InProgress,
        "expected {title} in progress, found {}",
        stored.status()
    );
    eyre::ensure!(
        stored.assigned_worker() == Some(worker_id),
        "expected {title} assigned to {name}"
    );
    Ok(())
}

#[then(r#"task "{title}" is queued"#)]
fn task_is_queued(world: &SchedulingWorld, title: String) -> Result<(), eyre::Report> {
    let stored = stored_task(world, &title)?;
    eyre::ensure!(
        stored.status() == TaskStatus::New && stored.in_queue(),
        "expected {title} queued, found {} (in_queue = {})",
        stored.status(),
        stored.in_queue()
    );
    eyre::ensure!(stored.assigned_worker().is_none(), "queued task has a worker");
    Ok(())
}

#[then(r#"worker "{name}" has a workload of {expected:f64} hours"#)]
fn worker_workload_is(
    world: &SchedulingWorld,
    name: String,
    expected: f64,
) -> Result<(), eyre::Report> {
    let worker_id = world.worker_id(&name)?;
    let stored = run_async(world.repository.find_worker(worker_id))?
        .ok_or_else(|| eyre::eyre!("worker {name} missing from repository"))?;
    let expected_hours = Hours::new(expected)?;
    eyre::ensure!(
        stored.workload() == expected_hours,
        "expected {name} workload {expected_hours}, found {}",
        stored.workload()
    );
    Ok(())
}
