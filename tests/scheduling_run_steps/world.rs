//! Shared world state for scheduling run BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use shopfloor::scheduling::{
    adapters::{memory::InMemoryShopRepository, milp::MilpAssignmentOptimizer},
    domain::{TaskId, WorkerId},
    services::{
        SchedulingOutcome, SchedulingRunError, SchedulingService, TaskDeskService,
        WorkerRosterService,
    },
};

/// Scheduling service type used by the BDD world.
pub type TestScheduling =
    SchedulingService<InMemoryShopRepository, MilpAssignmentOptimizer, DefaultClock>;

/// Scenario world for scheduling run behaviour tests.
pub struct SchedulingWorld {
    pub repository: Arc<InMemoryShopRepository>,
    pub scheduling: TestScheduling,
    pub desk: TaskDeskService<InMemoryShopRepository, DefaultClock>,
    pub roster: WorkerRosterService<InMemoryShopRepository, DefaultClock>,
    pub workers: HashMap<String, WorkerId>,
    pub tasks: HashMap<String, TaskId>,
    pub last_run: Option<Result<SchedulingOutcome, SchedulingRunError>>,
}

impl SchedulingWorld {
    /// Creates a world over an empty shop.
    #[must_use]
    pub fn new() -> Self {
        shopfloor::telemetry::init_tracing();
        let repository = Arc::new(InMemoryShopRepository::new());
        let clock = Arc::new(DefaultClock);
        Self {
            scheduling: SchedulingService::new(
                Arc::clone(&repository),
                Arc::new(MilpAssignmentOptimizer::default()),
                Arc::clone(&clock),
            ),
            desk: TaskDeskService::new(Arc::clone(&repository), Arc::clone(&clock)),
            roster: WorkerRosterService::new(Arc::clone(&repository), clock),
            repository,
            workers: HashMap::new(),
            tasks: HashMap::new(),
            last_run: None,
        }
    }

    /// Looks up a worker registered under `name` in this scenario.
    pub fn worker_id(&self, name: &str) -> Result<WorkerId, eyre::Report> {
        self.workers
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("no worker named {name} in scenario world"))
    }

    /// Looks up a task created under `title` in this scenario.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task titled {title} in scenario world"))
    }
}

impl Default for SchedulingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SchedulingWorld {
    SchedulingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
