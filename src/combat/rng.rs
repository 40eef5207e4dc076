//! Fast PRNG for combat simulation. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// Injectable roll source. Every combat function that rolls chance takes one of
/// these instead of reaching for a global generator, so replays are seedable
/// and tests can script exact outcomes.
pub trait Dice {
    /// Uniform draw in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// Independent chance check against probability `p` (clamped to `[0, 1]`).
    fn chance(&mut self, p: f64) -> bool {
        let clamped = p.clamp(0.0, 1.0);
        if clamped <= 0.0 {
            return false;
        }
        if clamped >= 1.0 {
            return true;
        }
        self.roll() < clamped
    }

    /// Uniform index in `[0, upper_exclusive)`. Returns 0 for empty ranges.
    fn pick(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive <= 1 {
            return 0;
        }
        let idx = (self.roll() * upper_exclusive as f64) as usize;
        idx.min(upper_exclusive - 1)
    }

    /// Uniform integer in `[lo, hi]` inclusive.
    fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo + 1) as usize;
        lo + self.pick(span) as i32
    }

    /// Weighted choice: returns an index with probability proportional to its
    /// weight. Non-positive weights contribute nothing; all-zero weights fall
    /// back to index 0.
    fn weighted_pick(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 {
            return 0;
        }
        let mut target = self.roll() * total;
        for (index, weight) in weights.iter().enumerate() {
            let weight = weight.max(0.0);
            if target < weight {
                return index;
            }
            target -= weight;
        }
        weights.len() - 1
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }
}

impl Dice for Rng {
    #[inline]
    fn roll(&mut self) -> f64 {
        // 53-bit mantissa draw.
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Scripted roll source for tests: returns the queued values in order and
/// repeats the final one once exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedDice {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.5;
        }
        let index = self.cursor.min(self.values.len() - 1);
        self.cursor += 1;
        self.values[index]
    }
}
