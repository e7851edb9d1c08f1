//! Weighted random selection.
//!
//! A single uniform roll in `[0, 1)` is scaled by the total weight and walked through the
//! candidates in the order given; the first candidate whose cumulative interval contains
//! the scaled roll wins. Callers pass quality tiers in their declared order so seeded
//! draws are reproducible.

use rand::Rng;

use super::errors::SampleError;

/// Pick one candidate using an externally supplied roll in `[0, 1)`.
///
/// Non-positive weights are treated as zero and can never be selected. When floating
/// point rounding leaves a sliver of remainder after the last interval (or the roll is
/// out of range), the last candidate with a positive weight is returned.
pub fn pick_by_roll<T: Clone>(items: &[(T, f64)], roll: f64) -> Result<T, SampleError> {
    if items.is_empty() {
        return Err(SampleError::Empty);
    }
    let total: f64 = items.iter().map(|(_, w)| effective(*w)).sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(SampleError::NoPositiveWeight);
    }

    let mut remaining = roll * total;
    for (item, weight) in items {
        let w = effective(*weight);
        if w <= 0.0 {
            continue;
        }
        if remaining < w {
            return Ok(item.clone());
        }
        remaining -= w;
    }

    // Remainder exhausted without landing in an interval.
    items
        .iter()
        .rev()
        .find(|(_, w)| effective(*w) > 0.0)
        .map(|(item, _)| item.clone())
        .ok_or(SampleError::NoPositiveWeight)
}

/// Pick one candidate with a roll drawn from `rng`.
pub fn pick<T: Clone, R: Rng + ?Sized>(items: &[(T, f64)], rng: &mut R) -> Result<T, SampleError> {
    let roll: f64 = rng.gen();
    pick_by_roll(items, roll)
}

fn effective(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}
