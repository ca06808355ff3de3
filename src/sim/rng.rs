//! Seedable random number generator
//!
//! Wraps a PCG-XSH-RR generator (64-bit LCG state, 32-bit output). The
//! generator is seeded once per process by the caller; nothing in the
//! simulation reads entropy on its own.
//!
//! Bounded draws use rejection sampling so that every value of a range is
//! equally likely. See <https://www.pcg-random.org/posts/bounded-rands.html>.

use rand::RngCore;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Default PCG state, used when no seed has been supplied
const DEFAULT_STATE: u64 = 0x853c_49e6_748f_ea9b;
/// Default PCG stream selector
const DEFAULT_SEQUENCE: u64 = 0xda3e_39cb_94b9_5bdb;

/// Deterministic generator for level generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerRng {
    pcg: Pcg32,
}

impl Default for TowerRng {
    fn default() -> Self {
        Self::new(DEFAULT_STATE, DEFAULT_SEQUENCE)
    }
}

impl TowerRng {
    /// Seed from a state word and a stream selector.
    ///
    /// The stream selector is turned into an odd LCG increment, so any value
    /// is a valid sequence. Each draw advances the LCG first and permutes the
    /// new state, so the first output already comes from `state * MUL + inc`.
    pub fn new(state: u64, sequence: u64) -> Self {
        // `Pcg32::new` adds the increment and steps once, then outputs the
        // pre-step state. Backing the increment out lines the two up.
        let increment = (sequence << 1) | 1;
        Self {
            pcg: Pcg32::new(state.wrapping_sub(increment), sequence),
        }
    }

    /// Raw 32-bit output
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.pcg.next_u32()
    }

    /// Uniformly distributed integer in `[0, n)`
    pub fn bounded(&mut self, n: u32) -> u32 {
        debug_assert!(n > 0, "bounded() needs a non-empty range");
        if n == 0 {
            return 0;
        }
        // Reject the top `2^32 % n` values, which would bias the low remainders.
        loop {
            let x = self.next_u32();
            let r = x % n;
            if x - r <= n.wrapping_neg() {
                return r;
            }
        }
    }

    /// Uniformly distributed integer in `[a, b]`, inclusive on both ends
    pub fn range(&mut self, a: u32, b: u32) -> u32 {
        debug_assert!(a <= b, "range({a}, {b}) is empty");
        match (b - a).checked_add(1) {
            Some(n) => a + self.bounded(n),
            None => self.next_u32(),
        }
    }

    /// A fair coin flip
    pub fn coin(&mut self) -> bool {
        self.range(0, 1) == 1
    }
}
