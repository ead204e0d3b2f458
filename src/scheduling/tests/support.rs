//! Shared fixtures for scheduling unit tests.

use crate::scheduling::{
    adapters::memory::InMemoryShopRepository,
    domain::{
        Hours, NewTaskData, SchedulingSnapshot, Specialization, Task, TaskCandidate, TaskId,
        Worker, WorkerCandidate, WorkerId,
    },
    ports::ShopRepository,
};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::Arc;

/// Clock pinned to one instant so aging and timestamps are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// "Today" for every scheduling test.
pub fn today() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0)
        .single()
        .expect("valid fixed date")
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    today() - Duration::days(days)
}

#[fixture]
pub fn clock() -> FixedClock {
    FixedClock(today())
}

pub fn hours(value: f64) -> Hours {
    Hours::new(value).expect("valid hours")
}

pub fn worker(name: &str, specialization: Specialization, max_hours: f64) -> Worker {
    Worker::new(name, specialization, hours(max_hours), &clock()).expect("valid worker")
}

pub fn task(title: &str, specialization: Specialization, duration: f64, age_days: i64) -> Task {
    Task::new(
        NewTaskData {
            title: title.to_owned(),
            required_specialization: specialization,
            duration: Hours::duration(duration).expect("positive duration"),
            issued_at: Some(days_ago(age_days)),
        },
        &clock(),
    )
    .expect("valid task")
}

pub fn task_candidate(specialization: Specialization, duration: f64, age_days: i64) -> TaskCandidate {
    TaskCandidate {
        id: TaskId::new(),
        required_specialization: specialization,
        duration: hours(duration),
        created_at: days_ago(age_days),
    }
}

pub fn worker_candidate(
    specialization: Specialization,
    max_hours: f64,
    workload: f64,
) -> WorkerCandidate {
    WorkerCandidate {
        id: WorkerId::new(),
        specialization,
        max_hours: hours(max_hours),
        workload: hours(workload),
    }
}

/// The reference scenario used across optimizer, repository and service
/// tests.
pub struct ReferenceScenario {
    pub w1: WorkerCandidate,
    pub w2: WorkerCandidate,
    pub t1: TaskCandidate,
    pub t2: TaskCandidate,
    pub t3: TaskCandidate,
}

impl ReferenceScenario {
    pub fn snapshot(&self) -> SchedulingSnapshot {
        SchedulingSnapshot::new(
            today(),
            [self.t1, self.t2, self.t3],
            [self.w1, self.w2],
        )
    }
}

/// W1 mechanic 8h idle, W2 electrician 4h with 3h committed; T1 mechanic 5h
/// issued ten days ago, T2 mechanic 4h issued yesterday, T3 electrician 2h
/// issued five days ago.
#[fixture]
pub fn reference() -> ReferenceScenario {
    ReferenceScenario {
        w1: worker_candidate(Specialization::Mechanic, 8.0, 0.0),
        w2: worker_candidate(Specialization::Electrician, 4.0, 3.0),
        t1: task_candidate(Specialization::Mechanic, 5.0, 10),
        t2: task_candidate(Specialization::Mechanic, 4.0, 1),
        t3: task_candidate(Specialization::Electrician, 2.0, 5),
    }
}

/// The reference scenario stored in an in-memory repository. W2's three
/// committed hours come from an electrician task already in progress.
pub struct ReferenceShop {
    pub repo: Arc<InMemoryShopRepository>,
    pub w1: Worker,
    pub w2: Worker,
    pub t1: Task,
    pub t2: Task,
    pub t3: Task,
}

pub async fn reference_shop() -> ReferenceShop {
    let repo = Arc::new(InMemoryShopRepository::new());
    let w1 = worker("Ada Mechanic", Specialization::Mechanic, 8.0);
    let w2 = worker("Eli Electrician", Specialization::Electrician, 4.0);
    repo.store_worker(&w1).await.expect("store w1");
    repo.store_worker(&w2).await.expect("store w2");

    let mut running = task("Alternator swap", Specialization::Electrician, 3.0, 20);
    running.assign_to(&w2, today()).expect("w2 is eligible");
    repo.store_task(&running).await.expect("store running task");

    let t1 = task("Engine rebuild", Specialization::Mechanic, 5.0, 10);
    let t2 = task("Suspension check", Specialization::Mechanic, 4.0, 1);
    let t3 = task("Headlight wiring", Specialization::Electrician, 2.0, 5);
    for pending in [&t1, &t2, &t3] {
        repo.store_task(pending).await.expect("store pending task");
    }

    ReferenceShop {
        repo,
        w1,
        w2,
        t1,
        t2,
        t3,
    }
}
