//! Port contracts for scheduling.
//!
//! Ports define infrastructure-agnostic interfaces used by scheduling
//! services: persistence of tasks and workers, and the solver that turns a
//! snapshot into a plan.

pub mod optimizer;
pub mod repository;

pub use optimizer::{AssignmentOptimizer, OptimizerError, OptimizerResult};
pub use repository::{CommitReport, ShopRepository, ShopRepositoryError, ShopRepositoryResult};

#[cfg(test)]
pub use optimizer::MockAssignmentOptimizer;
#[cfg(test)]
pub use repository::MockShopRepository;
