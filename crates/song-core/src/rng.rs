//! Deterministic roll source.
//!
//! Every random decision the engine makes goes through [`RollSource`], so a
//! run is fully reproducible from its seed and tests can substitute scripted
//! rolls.

/// Source of uniformly distributed rolls.
pub trait RollSource {
    /// Uniform integer in `0..n`. Returns 0 when `n` is 0.
    fn rn2(&mut self, n: u32) -> u32;

    /// True with 1-in-`n` odds.
    fn one_in(&mut self, n: u32) -> bool {
        self.rn2(n) == 0
    }

    /// True when a percentile roll lands under `chance`.
    fn percent(&mut self, chance: i32) -> bool {
        (self.rn2(100) as i32) < chance
    }
}

/// SplitMix64 stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRng {
    state: u64,
}

impl SongRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        mix64(self.state)
    }
}

impl RollSource for SongRng {
    fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        (self.next_u64() % u64::from(n)) as u32
    }
}

fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}
