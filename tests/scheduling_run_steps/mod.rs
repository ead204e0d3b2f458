//! Step definitions for scheduling run scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
