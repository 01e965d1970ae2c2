//! Last-resort synthetic series extrapolated from a single spot price.
//!
//! Produces a gently oscillating sequence with small random jitter around
//! the last known price: one full sine period across the window, ±0.5% of
//! amplitude each from the wave and the jitter. Only used when every real
//! data tier has failed; the result is shaped and cached like real data.

use rand::Rng;
use std::f64::consts::TAU;

/// Number of points for a window of `days`: one per hour, at least 10.
pub fn point_count(days: f64) -> usize {
    ((days * 24.0).round() as usize).max(10)
}

/// Extrapolate a series around `price` for a window of `days`.
///
/// Point `i` of `n` is
/// `price + price*0.01*jitter*0.5 + price*0.01*sin(TAU*i/n)*0.5`
/// with `jitter` drawn uniformly from `[-1, 1]` per point. The caller
/// supplies the RNG, so tests can pass a seeded one.
pub fn extrapolate(price: f64, days: f64, rng: &mut impl Rng) -> Vec<f64> {
    let n = point_count(days);
    (0..n)
        .map(|i| {
            let jitter: f64 = rng.gen_range(-1.0..=1.0);
            let wave = (TAU * i as f64 / n as f64).sin();
            price + price * 0.01 * jitter * 0.5 + price * 0.01 * wave * 0.5
        })
        .collect()
}
