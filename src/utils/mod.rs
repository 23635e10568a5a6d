pub mod keycode;

use rand::Rng;

/// Uniformly sample an inclusive millisecond range
///
/// A reversed range (`min > max`) is sampled over `max..=min` so that a
/// mistyped settings pair still produces a usable delay.
pub fn sample_millis<R: Rng + ?Sized>(rng: &mut R, min: u64, max: u64) -> u64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}
