//! When steps for scheduling run BDD scenarios.

use super::world::{SchedulingWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the scheduling run executes")]
fn scheduling_run_executes(world: &mut SchedulingWorld) {
    let result = run_async(world.scheduling.run());
    world.last_run = Some(result);
}

#[when(r#"task "{title}" is completed"#)]
fn task_is_completed(world: &mut SchedulingWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    run_async(world.desk.complete(task_id)).wrap_err("complete scenario task")?;
    Ok(())
}
