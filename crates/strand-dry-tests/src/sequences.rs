// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic pseudo-random snapshot sequences.
//!
//! Long sequences for soak-style tests where a proptest shrink would be too
//! slow. The same [`ChurnParams`] always yield the same sequence.

use strand_core::Snapshot;

/// Tiny deterministic RNG (xorshift64*) so fixtures don't need `rand`.
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a new PRNG; a zero seed is replaced with 1.
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// Returns the next pseudo-random `u64`.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Returns a pseudo-random value in `[0, upper)` (modulo bias is fine for tests).
    pub fn below(&mut self, upper: u64) -> u64 {
        if upper <= 1 {
            return 0;
        }
        self.next_u64() % upper
    }
}

/// Shape of a generated snapshot sequence.
#[derive(Clone, Copy, Debug)]
pub struct ChurnParams {
    /// RNG seed.
    pub seed: u64,
    /// Number of snapshots to generate.
    pub steps: usize,
    /// Ids are drawn from `0..key_space`.
    pub key_space: u32,
    /// Payloads are drawn from `0..payload_space`; small values force
    /// "changed back to an earlier value" cases.
    pub payload_space: u32,
    /// Per-id, per-step chance (percent) of being touched at all.
    pub churn_percent: u32,
}

impl Default for ChurnParams {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            steps: 64,
            key_space: 24,
            payload_space: 4,
            churn_percent: 30,
        }
    }
}

/// Generate `params.steps` snapshots where each id is independently kept,
/// removed, or (re)written with a random payload.
pub fn churn_sequence(params: ChurnParams) -> Vec<Snapshot<u32, u32>> {
    let mut rng = XorShift64::new(params.seed);
    let mut current: Snapshot<u32, u32> = Snapshot::new();
    let mut out = Vec::with_capacity(params.steps);

    for _ in 0..params.steps {
        let mut next: Vec<(u32, u32)> = Vec::new();
        for id in 0..params.key_space {
            let existing = current.get(&id).copied();
            if rng.below(100) >= u64::from(params.churn_percent) {
                next.extend(existing.map(|payload| (id, payload)));
                continue;
            }
            // Touched: half the time drop it, otherwise write a fresh payload
            // (which may equal the old one, i.e. a no-op write).
            if rng.below(2) == 0 {
                continue;
            }
            let payload = u32::try_from(rng.below(u64::from(params.payload_space))).unwrap_or(0);
            next.push((id, payload));
        }
        current = next.into_iter().collect();
        out.push(current.clone());
    }
    out
}
