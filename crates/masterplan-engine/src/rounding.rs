//! Largest-remainder rounding
//!
//! Rounds a list of shares to one decimal place while landing on an exact total.
//! Values are scaled to integer tenths, floored, and the shortfall is handed out one
//! tenth at a time to the entries with the largest fractional remainders.
//!
//! The correction only ever adds. When the floored values already meet or exceed
//! the target no correction happens, so the returned sum can be larger than the
//! target. Callers that need an exact sum must pass shares that already sum to at
//! most the target.

use crate::constants::percent::ROUNDING_SCALE;

#[derive(Debug, Clone, Copy)]
struct Remainder {
    index: usize,
    remainder: f64,
}

/// Rounds `values` onto `target_sum` at one-decimal precision.
///
/// Returns a list of the same length. Ties between equal remainders go to the
/// earlier index.
pub fn largest_remainder_round(values: &[f64], target_sum: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let scaled: Vec<f64> = values.iter().map(|v| v * ROUNDING_SCALE).collect();
    let mut floored: Vec<f64> = scaled.iter().map(|v| v.floor()).collect();

    let mut remainders: Vec<Remainder> = scaled
        .iter()
        .zip(&floored)
        .enumerate()
        .map(|(index, (s, f))| Remainder { index, remainder: s - f })
        .collect();
    // stable sort keeps index order among equal remainders
    remainders.sort_by(|a, b| b.remainder.total_cmp(&a.remainder));

    let floor_sum: f64 = floored.iter().sum();
    let deficit = (target_sum * ROUNDING_SCALE - floor_sum).round();

    if deficit > 0.0 {
        for step in 0..deficit as usize {
            let slot = remainders[step % remainders.len()].index;
            floored[slot] += 1.0;
        }
    }

    floored.into_iter().map(|v| v / ROUNDING_SCALE).collect()
}
