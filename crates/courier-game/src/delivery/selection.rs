//! Distance-weighted roulette selection

use rand::Rng;

/// Pick an index from `weights` given a roll in `[0, sum)`.
///
/// Walks the running sum and returns the first index whose cumulative
/// weight reaches the roll. If rounding leaves the roll past the end, the
/// last candidate wins. Returns `None` only for an empty slice.
pub fn roulette_index(weights: &[f32], roll: f32) -> Option<usize> {
    let last = weights.len().checked_sub(1)?;
    let mut sum = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        sum += weight;
        if sum >= roll {
            return Some(index);
        }
    }
    Some(last)
}

/// Pick an index with probability proportional to its weight
pub fn select_weighted<R: Rng + ?Sized>(weights: &[f32], rng: &mut R) -> Option<usize> {
    let total: f32 = weights.iter().sum();
    if weights.is_empty() {
        return None;
    }
    if total <= 0.0 {
        return Some(rng.gen_range(0..weights.len()));
    }
    roulette_index(weights, rng.gen_range(0.0..total))
}
