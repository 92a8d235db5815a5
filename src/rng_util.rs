use std::collections::HashSet;

/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Draw `k` distinct indices from `0..n` in random order.
pub(crate) fn partial_shuffle(n: usize, k: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let k = k.min(n);
    for i in 0..k {
        let j = rng.usize(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}

/// Draw `k` distinct values from `0..n` when `n` is too large to enumerate.
///
/// Requires `k` to be much smaller than `n`; callers use [`partial_shuffle`]
/// otherwise.
pub(crate) fn sample_distinct_u128(n: u128, k: usize, rng: &mut fastrand::Rng) -> Vec<u128> {
    let mut seen = HashSet::with_capacity(k);
    let mut out = Vec::with_capacity(k);
    while out.len() < k {
        let v = rng.u128(0..n);
        if seen.insert(v) {
            out.push(v);
        }
    }
    out
}
