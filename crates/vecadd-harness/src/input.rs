//! Random test-vector generation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fills input vectors with full-range signed values
///
/// Negative values and both extremes of `i32` are reachable, so the kernels'
/// wraparound behavior is exercised.
#[derive(Debug, Clone)]
pub struct InputGenerator {
    rng: StdRng,
}

impl InputGenerator {
    /// Seeds from `seed` offset by `worker`, or from the OS when `seed` is `None`.
    pub fn new(seed: Option<u64>, worker: usize) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker as u64)),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    pub fn fill(&mut self, buf: &mut [i32]) {
        for value in buf.iter_mut() {
            *value = self.rng.random();
        }
    }
}
