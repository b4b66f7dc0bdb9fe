use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Random source for one session, seeded exactly once.
///
/// All random move selections and node orders of a session draw from the same
/// stream; nothing in the crate reseeds an existing `SessionRng`.
#[derive(Debug, Clone)]
pub struct SessionRng {
    rng: SmallRng,
}

impl SessionRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_time() -> Self {
        Self::from_seed(time_seed())
    }

    /// Fills `out` with a random permutation of `0..out.len()`.
    pub fn randomized_index_vector(&mut self, out: &mut [u32]) {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = i as u32;
        }
        let size = out.len();
        for i in 0..size {
            let j = self.rng.gen_range(i..size);
            out.swap(i, j);
        }
    }
}

impl RngCore for SessionRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

pub(crate) fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Derives independent per-trial seeds from one base seed.
#[inline]
pub(crate) fn seed_for_trial(base_seed: u64, trial_index: u32) -> u64 {
    if trial_index == 0 {
        return base_seed;
    }

    // SplitMix64-style mixing.
    let mut z = base_seed ^ (trial_index as u64).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
