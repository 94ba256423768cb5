// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Test tracing subscriber.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber that writes through the test harness.
///
/// Honors `RUST_LOG` (e.g. `RUST_LOG=strand_core=debug`). Safe to call from
/// every test; only the first call installs a subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
