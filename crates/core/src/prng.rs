//! Seedable Xorshift64 generator used for factory-value randomization.
//!
//! Constants such as the seed point of a point map are re-drawn on every
//! reset. Drawing them from a seeded generator keeps headless runs and tests
//! reproducible while still giving a fresh value per reset.

use serde::{Deserialize, Serialize};

/// Xorshift64 (shifts 13, 7, 17). Same seed, same sequence.
///
/// The state is a single `u64` and the recurrence is pure integer
/// arithmetic, so a seed reproduces the same factory values on every
/// platform. The state serializes, which lets a paused session resume its
/// draw sequence exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Replaces a zero seed, which is a fixed point of the recurrence.
    const ZERO_SEED_REPLACEMENT: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a generator from `seed`.
    ///
    /// A zero seed would make every draw zero, so it is swapped for a fixed
    /// non-zero constant. `new(0)` is still deterministic.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 {
                Self::ZERO_SEED_REPLACEMENT
            } else {
                seed
            },
        }
    }

    /// Advances the state once and returns it.
    pub fn next_u64(&mut self) -> u64 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.state = s;
        s
    }

    /// Uniform f64 in [0, 1).
    ///
    /// Only the top 53 bits are used, one per mantissa bit, so every result is
    /// exactly representable and 1.0 is never returned.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, max).
    ///
    /// This is how `FactoryValue::Uniform` draws a constant. `min == max`
    /// yields `min`.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

impl Default for Xorshift64 {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_42_yields_golden_first_value() {
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn zero_seed_is_replaced() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(7);
        let mut b = Xorshift64::new(7);
        for i in 0..500 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at draw {i}");
        }
    }

    #[test]
    fn degenerate_range_yields_min() {
        let mut rng = Xorshift64::new(5);
        for _ in 0..10 {
            assert_eq!(rng.next_range(2.5, 2.5), 2.5);
        }
    }

    #[test]
    fn state_survives_json() {
        let mut rng = Xorshift64::new(99);
        for _ in 0..10 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        assert_eq!(rng.next_u64(), restored.next_u64());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "{v} outside [0, 1)");
                }
            }

            #[test]
            fn next_range_respects_bounds(seed: u64, min in -10.0_f64..10.0, width in 0.5_f64..10.0) {
                let mut rng = Xorshift64::new(seed);
                let max = min + width;
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "{v} outside [{min}, {max})");
                }
            }
        }
    }
}
