//! Service-shop task scheduling.
//!
//! Pending tasks are assigned to workers of the required specialization by
//! solving a binary program over a point-in-time snapshot. Tasks that cannot
//! be placed within worker capacity go to a queue instead of failing the run,
//! and every write that changes an assignment settles the affected workers'
//! cached workload. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
