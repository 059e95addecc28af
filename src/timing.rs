use crate::config::{DelayDistribution, TyperConfig};
use crate::keyboard::KeyboardModel;
use std::f64::consts::PI;

/// Smallest value fed to `ln` in the Box-Muller transform.
const MIN_UNIFORM: f64 = 1e-12;

/// Normally distributed sample via the Box-Muller transform.
///
/// `fastrand` draws from `[0, 1)`, so the first uniform can be exactly zero;
/// it is lifted to a tiny epsilon to keep the result finite.
pub fn sample_gaussian(rng: &mut fastrand::Rng, mean: f64, std_dev: f64) -> f64 {
    let u1 = rng.f64().max(MIN_UNIFORM);
    let u2 = rng.f64();
    gaussian_from_uniforms(u1, u2, mean, std_dev)
}

/// Deterministic half of [`sample_gaussian`], split out so the transform can
/// be checked against fixed uniforms.
pub fn gaussian_from_uniforms(u1: f64, u2: f64, mean: f64, std_dev: f64) -> f64 {
    let u1 = u1.max(MIN_UNIFORM);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + z * std_dev
}

/// Samples one of the typo phase delays. Negative draws become zero.
pub fn sample_phase(rng: &mut fastrand::Rng, dist: &DelayDistribution) -> f64 {
    sample_gaussian(rng, dist.mean, dist.std_dev).max(0.0)
}

/// Mean and standard deviation of the delay between two keys, or `None`
/// when the plain base delay applies.
pub fn delay_params(
    keyboard: &KeyboardModel,
    from: Option<char>,
    to: char,
    config: &TyperConfig,
) -> Option<(f64, f64)> {
    let distance = keyboard.distance(from?, to)?;
    let mean = config.base_delay + distance * config.distance_multiplier;
    Some((mean, mean * config.delay_variation))
}

/// Randomised inter-keystroke delay in milliseconds.
///
/// Without a previous key, or when either key is off the layout, this is
/// exactly `base_delay`. Otherwise the delay grows with key distance and is
/// never below `min_delay`.
pub fn inter_key_delay(
    rng: &mut fastrand::Rng,
    keyboard: &KeyboardModel,
    from: Option<char>,
    to: char,
    config: &TyperConfig,
) -> f64 {
    match delay_params(keyboard, from, to, config) {
        Some((mean, std_dev)) => sample_gaussian(rng, mean, std_dev).max(config.min_delay),
        None => config.base_delay,
    }
}
