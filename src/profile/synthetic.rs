//! Seeded synthetic daily load profiles for demos and tests.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::batch::{HOURS_PER_DAY, LoadBatch};
use crate::cluster::error::{ClusterError, Result};

/// A generator of synthetic daily load profiles with a single demand peak.
///
/// Each profile is a flat base consumption plus a Gaussian-shaped bump
/// centred on `peak_hour`, with random noise added per reading. Readings
/// are clamped to be non-negative.
///
/// # Examples
///
/// ```
/// use loadshape_cluster::profile::synthetic::ProfileGenerator;
///
/// // Evening peaker at 15-minute resolution
/// let mut generator = ProfileGenerator::new(
///     0.4,  // base_kw - overnight consumption
///     2.5,  // peak_kw - height of the evening bump
///     19.0, // peak_hour
///     1.5,  // peak_width_hours
///     0.05, // noise_std
///     96,   // steps_per_day
///     42,   // seed
/// );
///
/// let profile = generator.profile();
/// assert_eq!(profile.len(), 96);
/// ```
#[derive(Debug, Clone)]
pub struct ProfileGenerator {
    /// Flat base consumption in kilowatts
    pub base_kw: f64,

    /// Height of the peak above base in kilowatts
    pub peak_kw: f64,

    /// Hour of day at which demand peaks
    pub peak_hour: f64,

    /// Standard deviation of the peak bump in hours
    pub peak_width_hours: f64,

    /// Standard deviation of the Gaussian noise in kilowatts
    pub noise_std: f64,

    /// Number of readings per day
    pub steps_per_day: usize,

    rng: StdRng,
}

impl ProfileGenerator {
    /// Creates a new generator.
    ///
    /// # Arguments
    ///
    /// * `base_kw` - Flat base consumption in kilowatts
    /// * `peak_kw` - Height of the peak above base in kilowatts
    /// * `peak_hour` - Hour of day at which demand peaks
    /// * `peak_width_hours` - Width (standard deviation) of the peak in hours
    /// * `noise_std` - Standard deviation of per-reading noise in kilowatts
    /// * `steps_per_day` - Number of readings per profile
    /// * `seed` - Random seed for reproducible noise
    pub fn new(
        base_kw: f64,
        peak_kw: f64,
        peak_hour: f64,
        peak_width_hours: f64,
        noise_std: f64,
        steps_per_day: usize,
        seed: u64,
    ) -> Self {
        Self {
            base_kw,
            peak_kw,
            peak_hour,
            peak_width_hours: peak_width_hours.max(1e-3),
            noise_std,
            steps_per_day: steps_per_day.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produces the next profile; successive calls differ only by noise.
    pub fn profile(&mut self) -> Vec<f64> {
        let dt = HOURS_PER_DAY / self.steps_per_day as f64;
        (0..self.steps_per_day)
            .map(|t| {
                let offset = (t as f64 * dt - self.peak_hour) / self.peak_width_hours;
                let bump = self.peak_kw * (-0.5 * offset * offset).exp();
                let kw = self.base_kw + bump + gaussian_noise(&mut self.rng, self.noise_std);
                kw.max(0.0)
            })
            .collect()
    }
}

/// Gaussian noise via the Box-Muller transform.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Archetypes mixed by [`demo_batch`]: (base kW, peak kW, peak hour).
const DEMO_ARCHETYPES: [(f64, f64, f64); 4] = [
    (0.3, 1.2, 7.5),  // small household, morning peak
    (0.3, 1.2, 19.0), // small household, evening peak
    (1.5, 4.0, 8.0),  // large consumer, morning peak
    (1.5, 4.0, 18.5), // large consumer, evening peak
];

/// Builds a demo batch of `n` profiles cycling through four archetypes:
/// small and large consumers, each peaking either in the morning or the evening.
///
/// # Errors
///
/// Returns `ClusterError::InvalidInput` if `n` or `steps_per_day` is zero.
pub fn demo_batch(n: usize, steps_per_day: usize, seed: u64) -> Result<LoadBatch> {
    if steps_per_day == 0 {
        return Err(ClusterError::invalid_input("steps_per_day must be > 0"));
    }

    let mut generators: Vec<ProfileGenerator> = DEMO_ARCHETYPES
        .iter()
        .enumerate()
        .map(|(i, &(base, peak, hour))| {
            let seed = seed.wrapping_add(i as u64);
            ProfileGenerator::new(base, peak, hour, 1.5, 0.05, steps_per_day, seed)
        })
        .collect();

    let rows = (0..n)
        .map(|i| generators[i % DEMO_ARCHETYPES.len()].profile())
        .collect();
    LoadBatch::new(rows)
}
