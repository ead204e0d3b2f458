//! Given steps for scheduling run BDD scenarios.

use super::world::{SchedulingWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use shopfloor::scheduling::services::{CreateTaskRequest, RegisterWorkerRequest};

#[given(r#"a worker "{name}" specialised in "{specialization}" with {max_hours:f64} hours capacity"#)]
fn worker_with_capacity(
    world: &mut SchedulingWorld,
    name: String,
    specialization: String,
    max_hours: f64,
) -> Result<(), eyre::Report> {
    let registered = run_async(world.roster.register(RegisterWorkerRequest::new(
        name.clone(),
        specialization,
        max_hours,
    )))
    .wrap_err("register scenario worker")?;
    world.workers.insert(name, registered.id());
    Ok(())
}

#[given(r#"worker "{name}" is already working a {duration:f64} hour "{specialization}" task"#)]
fn worker_already_busy(
    world: &mut SchedulingWorld,
    name: String,
    duration: f64,
    specialization: String,
) -> Result<(), eyre::Report> {
    let worker_id = world.worker_id(&name)?;
    let request = CreateTaskRequest::new(format!("{name} current job"), specialization, duration);
    let running = run_async(world.desk.create_task(request)).wrap_err("create running task")?;
    run_async(world.desk.assign(running.id(), worker_id)).wrap_err("assign running task")?;
    Ok(())
}

#[given(r#"worker "{name}" is deactivated"#)]
fn worker_deactivated(world: &mut SchedulingWorld, name: String) -> Result<(), eyre::Report> {
    let worker_id = world.worker_id(&name)?;
    run_async(world.roster.deactivate(worker_id)).wrap_err("deactivate scenario worker")?;
    Ok(())
}

#[given(r#"a "{specialization}" task "{title}" of {duration:f64} hours issued {age:i64} days ago"#)]
fn pending_task(
    world: &mut SchedulingWorld,
    specialization: String,
    title: String,
    duration: f64,
    age: i64,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(title.clone(), specialization, duration)
        .with_issued_at(Utc::now() - Duration::days(age));
    let created = run_async(world.desk.create_task(request)).wrap_err("create scenario task")?;
    world.tasks.insert(title, created.id());
    Ok(())
}
