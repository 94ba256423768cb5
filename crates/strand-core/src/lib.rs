// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! strand-core: append-only history compression and time travel for keyed tables.
//!
//! A tracked table is fed to a [`Store`] one [`Snapshot`] per time step. The
//! store keeps a single [`Observation`] table (the current rows, each tagged
//! with the time its payload was last set) and emits one [`DifferenceSlice`]
//! per step holding only the intervals that just closed. Together the
//! observation and the chain of slices encode the full [`HistoryTable`]
//! losslessly:
//!
//! ```text
//! History(t) = Observation(t) ∪ D_t ∪ D_{t-1} ∪ … ∪ D_1
//! ```
//!
//! [`at_time`] reconstructs any past snapshot from the observation plus the
//! slices newer than the queried time, in a single pass.
//!
//! # Key Types
//!
//! - [`Store`]: owns the observation table and advances it one step at a time.
//! - [`DifferenceChain`] / [`Timeline`]: optional application-side retention of
//!   emitted slices.
//! - [`materialize`] / [`decompose`]: convert between snapshot sequences, the
//!   full history table and the compressed form.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod chain;
mod config;
mod diff;
mod error;
mod materialize;
mod model;
mod query;
mod retention;
mod store;
mod timeline;

/// Application-side slice retention.
pub use chain::DifferenceChain;
/// Tunables shared by [`Timeline`] and its embedding application.
pub use config::HistoryConfig;
/// Snapshot diffing.
pub use diff::{compute_diff, Diff, DiffStats};
/// Error type for every fallible operation in this crate.
pub use error::HistoryError;
/// Conversions between snapshot sequences, history tables and the compressed form.
pub use materialize::{decompose, materialize};
/// Row, snapshot and table model.
pub use model::{
    DifferenceSlice, HistoryRow, HistoryTable, Key, Observation, Payload, Record, Snapshot, Time,
};
/// Point-in-time reconstruction.
pub use query::{at_time, at_time_checked};
/// Retention policy for difference chains.
pub use retention::RetentionPolicy;
/// Incremental observation/difference compressor.
pub use store::Store;
/// Store plus retained chain, driven by a [`HistoryConfig`].
pub use timeline::Timeline;
