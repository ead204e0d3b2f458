//! Shared assertions for in-memory integration tests.

use shopfloor::scheduling::{domain::Hours, ports::ShopRepository};

/// Checks that every worker's cached workload equals the hours of the
/// in-progress tasks assigned to it.
///
/// # Errors
///
/// Returns an error naming the first worker whose cache has drifted.
pub async fn assert_workloads_consistent(repo: &impl ShopRepository) -> eyre::Result<()> {
    for worker in repo.list_workers().await? {
        let assigned: Hours = repo
            .list_tasks_for_worker(worker.id())
            .await?
            .iter()
            .map(|task| task.duration())
            .sum();
        eyre::ensure!(
            worker.workload() == assigned,
            "{} caches {} but holds {}",
            worker.full_name(),
            worker.workload(),
            assigned
        );
    }
    Ok(())
}
