// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical snapshot sequences.

use strand_core::Snapshot;

use crate::frames::snapshot;

/// The four-step worked example.
///
/// ```text
/// V1 = {(1,"a")}
/// V2 = {(1,"a"), (2,"b")}
/// V3 = {(1,"c"), (2,"b")}
/// V4 = {(2,"b")}
/// ```
///
/// Expected slices: `D1 = D2 = ∅`, `D3 = {(1, 1..3, "a")}`,
/// `D4 = {(1, 3..4, "c")}`; the final observation is `{(2, 2.., "b")}`.
pub struct WorkedExample {
    /// Snapshots `V1..=V4` in time order.
    pub snapshots: [Snapshot<u32, &'static str>; 4],
}

/// Build the four-step worked example.
pub fn worked_example() -> WorkedExample {
    WorkedExample {
        snapshots: [
            snapshot(&[(1, "a")]),
            snapshot(&[(1, "a"), (2, "b")]),
            snapshot(&[(1, "c"), (2, "b")]),
            snapshot(&[(2, "b")]),
        ],
    }
}
