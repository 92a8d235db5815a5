use parking_lot::Mutex;

use crate::rng_util;

/// Corner sets up to this size are shuffled in full; larger ones are sampled
/// by rejection.
const FULL_SHUFFLE_LIMIT: u128 = 1 << 16;

/// Source of randomness for continuous sampling.
///
/// Sampling only needs `&self`, so one sampler can be shared by several
/// callers. Use [`with_seed`](Self::with_seed) for reproducible draws.
///
/// # Examples
///
/// ```
/// use searchspace::ContinuousSampler;
///
/// // Create with default RNG
/// let sampler = ContinuousSampler::new();
///
/// // Create with a fixed seed for reproducibility
/// let sampler = ContinuousSampler::with_seed(42);
/// ```
pub struct ContinuousSampler {
    rng: Mutex<fastrand::Rng>,
}

impl ContinuousSampler {
    /// Creates a sampler with a default random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Creates a sampler with a fixed seed.
    ///
    /// Using the same seed will produce the same sequence of samples.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    /// Draws `n` points uniformly from the box given by per-dimension
    /// `(lower, upper)` bounds. Returns one vector per dimension.
    pub(crate) fn uniform(&self, bounds: &[(f64, f64)], n: usize) -> Vec<Vec<f64>> {
        let mut rng = self.rng.lock();
        let mut columns: Vec<Vec<f64>> = bounds.iter().map(|_| Vec::with_capacity(n)).collect();
        for _ in 0..n {
            for (column, &(lower, upper)) in columns.iter_mut().zip(bounds) {
                column.push(rng_util::f64_range(&mut rng, lower, upper));
            }
        }
        columns
    }

    /// Draws `n` distinct indices from `0..count` in random order.
    ///
    /// `n` must not exceed `count`.
    pub(crate) fn distinct_indices(&self, count: u128, n: usize) -> Vec<u128> {
        let mut rng = self.rng.lock();
        let small = count <= FULL_SHUFFLE_LIMIT || count <= 4 * n as u128;
        match usize::try_from(count) {
            Ok(count) if small => rng_util::partial_shuffle(count, n, &mut rng)
                .into_iter()
                .map(|i| i as u128)
                .collect(),
            _ => rng_util::sample_distinct_u128(count, n, &mut rng),
        }
    }
}

impl Default for ContinuousSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ContinuousSampler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ContinuousSampler").finish_non_exhaustive()
    }
}
