//! Shopfloor: capacity-aware assignment of service-shop tasks.
//!
//! This crate assigns pending repair and maintenance tasks to qualified
//! workers, respecting each worker's hour ceiling and minimizing a cost that
//! balances load, task age and a penalty for leaving work unassigned.
//!
//! # Architecture
//!
//! Shopfloor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and solving
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`,
//!   MILP solver)
//!
//! # Modules
//!
//! - [`scheduling`]: Snapshot, optimizer, commit and workload tracking
//! - [`config`]: Objective tunables and database settings
//! - [`telemetry`]: Tracing subscriber bootstrap

pub mod config;
pub mod scheduling;
pub mod telemetry;
