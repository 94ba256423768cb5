// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Strand crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`frames`] - Snapshot and record builders
//! - [`scenarios`] - Canonical snapshot sequences (the four-step worked example)
//! - [`sequences`] - Deterministic pseudo-random snapshot sequences
//! - [`trace`] - Test tracing subscriber

pub mod config;
pub mod frames;
pub mod scenarios;
pub mod sequences;
pub mod trace;

// Re-export commonly used items at crate root for convenience
pub use config::InMemoryConfigStore;
pub use frames::{records, snapshot, SnapshotBuilder};
pub use scenarios::{worked_example, WorkedExample};
pub use sequences::{churn_sequence, ChurnParams, XorShift64};
pub use trace::init_test_tracing;
