//! Unit tests for task transitions, value types and snapshot capture.

use super::support::{
    FixedClock, clock, days_ago, hours, task, task_candidate, today, worker, worker_candidate,
};
use crate::scheduling::domain::{
    Assignment, AssignmentPlan, Hours, NewTaskData, PersistedTaskData, PlanViolation, SchedulingDomainError,
    SchedulingSnapshot, Specialization, Task, TaskId, TaskRevision, TaskStatus, WorkerId,
    derive_workload,
};
use eyre::ensure;
use rstest::rstest;

#[rstest]
#[case(-1.0)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn hours_rejects_negative_and_non_finite(#[case] value: f64) {
    assert!(matches!(
        Hours::new(value),
        Err(SchedulingDomainError::InvalidHours(_))
    ));
}

#[rstest]
fn durations_must_be_positive() {
    assert!(matches!(
        Hours::duration(0.0),
        Err(SchedulingDomainError::NonPositiveDuration(_))
    ));
    assert!(Hours::duration(0.5).is_ok());
}

#[rstest]
fn hours_sum_and_saturating_sub() {
    let total: Hours = [hours(1.5), hours(2.5)].iter().sum();
    assert_eq!(total, hours(4.0));
    assert_eq!(hours(3.0).saturating_sub(hours(5.0)), Hours::ZERO);
    assert_eq!(total.to_string(), "4.00h");
}

#[rstest]
#[case("mechanic", Specialization::Mechanic)]
#[case("  ELECTRICIAN ", Specialization::Electrician)]
#[case("Body Work", Specialization::BodyWork)]
#[case("tire-service", Specialization::TireService)]
#[case("diagnostics", Specialization::Diagnostics)]
fn specialization_labels_parse(#[case] label: &str, #[case] expected: Specialization) {
    assert_eq!(Specialization::try_from(label), Ok(expected));
}

#[rstest]
#[case("plumber")]
#[case("mech")]
#[case("")]
fn unknown_specialization_labels_are_rejected(#[case] label: &str) {
    assert!(Specialization::try_from(label).is_err());
}

#[rstest]
fn every_specialization_round_trips_through_its_label() {
    for specialization in Specialization::ALL {
        assert_eq!(
            Specialization::try_from(specialization.as_str()),
            Ok(specialization)
        );
    }
}

#[rstest]
fn new_task_is_unassigned_and_outside_the_queue() {
    let fresh = task("Replace brake pads", Specialization::Mechanic, 2.0, 3);
    assert_eq!(fresh.status(), TaskStatus::New);
    assert_eq!(fresh.assigned_worker(), None);
    assert!(!fresh.in_queue());
    assert!(fresh.is_schedulable());
    assert_eq!(fresh.created_at(), days_ago(3));
    assert_eq!(fresh.updated_at(), today());
}

#[rstest]
fn blank_task_title_is_rejected(clock: FixedClock) {
    let result = Task::new(
        NewTaskData {
            title: "   ".to_owned(),
            required_specialization: Specialization::Painter,
            duration: hours(1.0),
            issued_at: None,
        },
        &clock,
    );
    assert_eq!(result, Err(SchedulingDomainError::EmptyTaskTitle));
}

#[rstest]
fn assign_moves_task_in_progress_and_clears_queue() -> eyre::Result<()> {
    let mechanic = worker("Ada", Specialization::Mechanic, 8.0);
    let mut job = task("Oil change", Specialization::Mechanic, 1.0, 0);
    job.send_to_queue(today())?;
    ensure!(job.in_queue());

    job.assign_to(&mechanic, today())?;

    ensure!(job.status() == TaskStatus::InProgress);
    ensure!(job.assigned_worker() == Some(mechanic.id()));
    ensure!(!job.in_queue());
    ensure!(!job.is_schedulable());
    Ok(())
}

#[rstest]
fn assign_rejects_specialization_mismatch() {
    let painter = worker("Bo", Specialization::Painter, 8.0);
    let mut job = task("Rewire dash", Specialization::Electrician, 2.0, 0);

    let result = job.assign_to(&painter, today());

    assert!(matches!(
        result,
        Err(SchedulingDomainError::SpecializationMismatch {
            required: Specialization::Electrician,
            offered: Specialization::Painter,
            ..
        })
    ));
    assert_eq!(job.status(), TaskStatus::New);
}

#[rstest]
fn assign_rejects_inactive_worker(clock: FixedClock) {
    let mut idle = worker("Cy", Specialization::Mechanic, 8.0);
    idle.set_active(false, &clock);
    let mut job = task("Timing belt", Specialization::Mechanic, 3.0, 0);

    assert_eq!(
        job.assign_to(&idle, today()),
        Err(SchedulingDomainError::InactiveWorker(idle.id()))
    );
}

#[rstest]
fn queueing_requires_a_new_task() -> eyre::Result<()> {
    let mechanic = worker("Ada", Specialization::Mechanic, 8.0);
    let mut job = task("Clutch", Specialization::Mechanic, 4.0, 0);
    job.assign_to(&mechanic, today())?;

    let result = job.send_to_queue(today());

    ensure!(matches!(
        result,
        Err(SchedulingDomainError::InvalidTransition {
            from: TaskStatus::InProgress,
            ..
        })
    ));
    ensure!(job.assigned_worker() == Some(mechanic.id()));
    Ok(())
}

#[rstest]
fn release_returns_the_previous_worker() -> eyre::Result<()> {
    let mechanic = worker("Ada", Specialization::Mechanic, 8.0);
    let mut job = task("Clutch", Specialization::Mechanic, 4.0, 0);
    job.assign_to(&mechanic, today())?;

    let previous = job.release(today())?;

    ensure!(previous == Some(mechanic.id()));
    ensure!(job.status() == TaskStatus::New);
    ensure!(job.assigned_worker().is_none());
    ensure!(job.is_schedulable());
    Ok(())
}

#[rstest]
fn complete_archives_and_unassigns() -> eyre::Result<()> {
    let mechanic = worker("Ada", Specialization::Mechanic, 8.0);
    let mut job = task("Clutch", Specialization::Mechanic, 4.0, 0);
    job.assign_to(&mechanic, today())?;

    let previous = job.complete(today())?;

    ensure!(previous == Some(mechanic.id()));
    ensure!(job.status() == TaskStatus::Completed);
    ensure!(job.archived());
    ensure!(job.assigned_worker().is_none());
    ensure!(job.complete(today()).is_err());
    Ok(())
}

#[rstest]
fn archive_is_refused_while_in_progress() -> eyre::Result<()> {
    let mechanic = worker("Ada", Specialization::Mechanic, 8.0);
    let mut job = task("Clutch", Specialization::Mechanic, 4.0, 0);
    job.assign_to(&mechanic, today())?;
    ensure!(job.archive(today()).is_err());

    let mut pending = task("Wipers", Specialization::Mechanic, 0.5, 0);
    pending.send_to_queue(today())?;
    pending.archive(today())?;
    ensure!(pending.archived());
    ensure!(!pending.in_queue());
    ensure!(!pending.is_schedulable());
    Ok(())
}

#[rstest]
fn reassign_moves_work_between_matching_workers() -> eyre::Result<()> {
    let first = worker("Ada", Specialization::Mechanic, 8.0);
    let second = worker("Dee", Specialization::Mechanic, 8.0);
    let mut job = task("Gearbox", Specialization::Mechanic, 6.0, 0);
    job.assign_to(&first, today())?;

    let previous = job.reassign_to(&second, today())?;

    ensure!(previous == Some(first.id()));
    ensure!(job.assigned_worker() == Some(second.id()));
    Ok(())
}

#[rstest]
fn revise_rejects_specialization_that_strands_the_worker() -> eyre::Result<()> {
    let mechanic = worker("Ada", Specialization::Mechanic, 8.0);
    let mut job = task("Noise check", Specialization::Mechanic, 1.0, 0);
    job.assign_to(&mechanic, today())?;

    let revision = TaskRevision {
        required_specialization: Some(Specialization::Diagnostics),
        ..TaskRevision::default()
    };
    let result = job.revise(revision, Some(&mechanic), today());

    ensure!(matches!(
        result,
        Err(SchedulingDomainError::SpecializationMismatch { .. })
    ));
    ensure!(job.required_specialization() == Specialization::Mechanic);
    Ok(())
}

#[rstest]
fn revise_updates_fields_on_new_task() -> eyre::Result<()> {
    let mut job = task("Noise check", Specialization::Mechanic, 1.0, 0);
    let revision = TaskRevision {
        title: Some("  Road test  ".to_owned()),
        duration: Some(hours(1.5)),
        required_specialization: Some(Specialization::Diagnostics),
    };

    job.revise(revision, None, today())?;

    ensure!(job.title() == "Road test");
    ensure!(job.duration() == hours(1.5));
    ensure!(job.required_specialization() == Specialization::Diagnostics);
    Ok(())
}

#[rstest]
#[case(TaskStatus::InProgress, None, false)]
#[case(TaskStatus::New, Some(WorkerId::new()), false)]
#[case(TaskStatus::Completed, Some(WorkerId::new()), false)]
#[case(TaskStatus::New, None, true)]
#[case(TaskStatus::InProgress, Some(WorkerId::new()), true)]
fn persisted_tasks_must_respect_the_assignment_invariant(
    #[case] status: TaskStatus,
    #[case] assigned_worker: Option<WorkerId>,
    #[case] accepted: bool,
) {
    let id = TaskId::new();
    let result = Task::from_persisted(PersistedTaskData {
        id,
        title: "Stored".to_owned(),
        required_specialization: Specialization::BodyWork,
        duration: hours(2.0),
        status,
        assigned_worker,
        in_queue: false,
        archived: false,
        created_at: today(),
        updated_at: today(),
    });

    assert_eq!(result.is_ok(), accepted);
    if !accepted {
        assert_eq!(
            result,
            Err(SchedulingDomainError::InconsistentTaskState(id))
        );
    }
}

#[rstest]
fn workload_counts_only_in_progress_tasks_of_that_worker() -> eyre::Result<()> {
    let ada = worker("Ada", Specialization::Mechanic, 8.0);
    let dee = worker("Dee", Specialization::Mechanic, 8.0);
    let mut first = task("A", Specialization::Mechanic, 2.0, 0);
    let mut second = task("B", Specialization::Mechanic, 3.0, 0);
    let mut finished = task("C", Specialization::Mechanic, 5.0, 0);
    let mut elsewhere = task("D", Specialization::Mechanic, 7.0, 0);
    let untouched = task("E", Specialization::Mechanic, 11.0, 0);
    first.assign_to(&ada, today())?;
    second.assign_to(&ada, today())?;
    finished.assign_to(&ada, today())?;
    finished.complete(today())?;
    elsewhere.assign_to(&dee, today())?;

    let all = [first, second, finished, elsewhere, untouched];

    ensure!(derive_workload(ada.id(), &all) == hours(5.0));
    ensure!(derive_workload(dee.id(), &all) == hours(7.0));
    Ok(())
}

#[rstest]
fn capture_keeps_schedulable_tasks_and_active_workers(clock: FixedClock) -> eyre::Result<()> {
    let ada = worker("Ada", Specialization::Mechanic, 8.0);
    let mut away = worker("Bo", Specialization::Mechanic, 8.0);
    away.set_active(false, &clock);

    let pending = task("Pending", Specialization::Mechanic, 1.0, 0);
    let mut queued = task("Queued", Specialization::Mechanic, 1.0, 0);
    queued.send_to_queue(today())?;
    let mut running = task("Running", Specialization::Mechanic, 3.0, 0);
    running.assign_to(&ada, today())?;
    let mut shelved = task("Shelved", Specialization::Mechanic, 1.0, 0);
    shelved.archive(today())?;

    let snapshot = SchedulingSnapshot::capture(
        today(),
        &[pending.clone(), queued.clone(), running, shelved],
        &[ada.clone(), away],
    );

    let task_ids: Vec<TaskId> = snapshot.tasks().keys().copied().collect();
    let mut expected = vec![pending.id(), queued.id()];
    expected.sort();
    ensure!(task_ids == expected);
    ensure!(snapshot.workers().len() == 1);
    let candidate = snapshot
        .workers()
        .get(&ada.id())
        .ok_or_else(|| eyre::eyre!("active worker missing from snapshot"))?;
    // Ada's cached workload is still zero; the snapshot derives it.
    ensure!(ada.workload() == Hours::ZERO);
    ensure!(candidate.workload == hours(3.0));
    ensure!(candidate.free_capacity() == hours(5.0));
    Ok(())
}

#[rstest]
fn plan_summary_counts_assignments_and_queue() {
    let plan = AssignmentPlan::new(
        today(),
        vec![Assignment::new(WorkerId::new(), TaskId::new())],
        vec![TaskId::new(), TaskId::new()],
        2004.0,
    );
    assert_eq!(plan.to_string(), "1 tasks assigned, 2 tasks queued");
}

#[rstest]
fn plan_validation_reports_capacity_breach() {
    let ada = worker_candidate(Specialization::Mechanic, 4.0, 1.0);
    let big = task_candidate(Specialization::Mechanic, 4.0, 0);
    let snapshot = SchedulingSnapshot::new(today(), [big], [ada]);
    let plan = AssignmentPlan::new(
        today(),
        vec![Assignment::new(ada.id, big.id)],
        Vec::new(),
        0.0,
    );

    assert!(matches!(
        plan.validate_against(&snapshot),
        Err(PlanViolation::CapacityExceeded { worker_id, .. }) if worker_id == ada.id
    ));
}

#[rstest]
fn plan_validation_reports_uncovered_and_ineligible_tasks() {
    let ada = worker_candidate(Specialization::Mechanic, 8.0, 0.0);
    let wiring = task_candidate(Specialization::Electrician, 1.0, 0);
    let snapshot = SchedulingSnapshot::new(today(), [wiring], [ada]);

    let uncovered = AssignmentPlan::empty(today());
    assert_eq!(
        uncovered.validate_against(&snapshot),
        Err(PlanViolation::TaskNotCovered(wiring.id))
    );

    let ineligible = AssignmentPlan::new(
        today(),
        vec![Assignment::new(ada.id, wiring.id)],
        Vec::new(),
        0.0,
    );
    assert_eq!(
        ineligible.validate_against(&snapshot),
        Err(PlanViolation::Ineligible {
            task_id: wiring.id,
            worker_id: ada.id,
        })
    );
}
