//! Random sources and the Box-Muller normal generator.

use rand::{Rng, rngs::StdRng};

/// Supplier of uniform draws in `[0, 1)`.
///
/// The pricing pipeline takes draws only through this trait so tests can feed
/// it fixed sequences.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;
}

impl RandomSource for StdRng {
    fn uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// # Examples
///
/// ```
/// use tou_rates::tariff::noise::{FixedDraws, RandomSource};
///
/// let mut draws = FixedDraws::new(vec![0.25, 0.75]);
/// assert_eq!(draws.uniform(), 0.25);
/// assert_eq!(draws.uniform(), 0.75);
/// assert_eq!(draws.uniform(), 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct FixedDraws {
    values: Vec<f64>,
    next: usize,
}

impl FixedDraws {
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "FixedDraws needs at least one value");
        Self { values, next: 0 }
    }
}

impl RandomSource for FixedDraws {
    fn uniform(&mut self) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

/// Draws a standard normal value via the Box-Muller transform.
///
/// Consumes two uniforms, `u1` then `u2`. A zero `u1` is clamped to the
/// smallest positive `f64` so the logarithm stays finite.
pub fn standard_normal(source: &mut dyn RandomSource) -> f64 {
    let u1 = source.uniform().max(f64::MIN_POSITIVE);
    let u2 = source.uniform();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
