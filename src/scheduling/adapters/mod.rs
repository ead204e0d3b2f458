//! Adapter implementations of the scheduling ports.

pub mod memory;
pub mod milp;
pub mod postgres;

mod plan_commit;
