//! Unit tests for the scheduling module.
//!
//! Covers domain transitions and invariants, the cost model, the optimizer
//! on hand-computed scenarios, the in-memory repository's commit semantics,
//! and service orchestration including failure categories.

mod domain_tests;
mod support;
