//! Pair-generation sampler
//!
//! Gantree: L3_Source → PairGenerationSampler
//!
//! Draws the photon (or pair) count of one emission cycle. The distribution
//! is prepared once, so an invalid mode or mean fails at construction and a
//! draw never fails.

use crate::config::{validate_mean, PhotonStatistics};
use qlight_core::{QlightError, QlightResult};
use qlight_kernel::EntityRng;
use rand_distr::{Geometric, Poisson};
use std::fmt;

/// Prepared count distribution
#[derive(Debug, Clone, Copy)]
enum CountDistribution {
    Thermal(Geometric),
    Poisson(Poisson<f64>),
    Zero,
}

/// Per-cycle count sampler
/// Gantree: PairGenerationSampler // 쌍 생성 샘플러
#[derive(Debug, Clone, Copy)]
pub struct PairGenerationSampler {
    statistics: PhotonStatistics,
    mean_photon_num: f64,
    distribution: CountDistribution,
}

impl PairGenerationSampler {
    /// Create a sampler for `mean_photon_num` under `statistics`
    /// Gantree: new(statistics,mean) -> Result<Self> // 생성
    pub fn new(statistics: PhotonStatistics, mean_photon_num: f64) -> QlightResult<Self> {
        validate_mean(mean_photon_num)?;

        let distribution = match statistics {
            // Failures before the first success: mean = (1-p)/p = mean_photon_num
            PhotonStatistics::Thermal => {
                let p = 1.0 / (1.0 + mean_photon_num);
                CountDistribution::Thermal(Geometric::new(p).map_err(|e| {
                    QlightError::InvalidConfiguration(format!("thermal p={}: {}", p, e))
                })?)
            }
            PhotonStatistics::Poisson if mean_photon_num == 0.0 => CountDistribution::Zero,
            PhotonStatistics::Poisson => {
                CountDistribution::Poisson(Poisson::new(mean_photon_num).map_err(|e| {
                    QlightError::InvalidConfiguration(format!(
                        "poisson rate={}: {}",
                        mean_photon_num, e
                    ))
                })?)
            }
        };

        Ok(Self {
            statistics,
            mean_photon_num,
            distribution,
        })
    }

    /// Parse the mode name and create a sampler
    pub fn from_mode(mode: &str, mean_photon_num: f64) -> QlightResult<Self> {
        Self::new(mode.parse()?, mean_photon_num)
    }

    /// Draw one count
    /// Gantree: sample(rng) -> u64 // 1회 추출
    ///
    /// Consumes one draw from `rng`, except for a zero-rate Poisson which
    /// consumes none.
    pub fn sample(&self, rng: &mut EntityRng) -> u64 {
        match &self.distribution {
            CountDistribution::Thermal(dist) => rng.sample(dist),
            CountDistribution::Poisson(dist) => {
                let draw: f64 = rng.sample(dist);
                draw as u64
            }
            CountDistribution::Zero => 0,
        }
    }

    /// Statistical mode
    pub fn statistics(&self) -> PhotonStatistics {
        self.statistics
    }

    /// Mean count per cycle
    pub fn mean_photon_num(&self) -> f64 {
        self.mean_photon_num
    }
}

impl fmt::Display for PairGenerationSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PairGenerationSampler({}, mean={})",
            self.statistics, self.mean_photon_num
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn empirical_mean(sampler: &PairGenerationSampler, seed: u64, n: usize) -> f64 {
        let mut rng = EntityRng::seeded(seed);
        let total: u64 = (0..n).map(|_| sampler.sample(&mut rng)).sum();
        total as f64 / n as f64
    }

    #[test]
    fn test_thermal_mean_converges() {
        for mean in [0.1, 1.0, 2.5] {
            let sampler = PairGenerationSampler::new(PhotonStatistics::Thermal, mean).unwrap();
            let observed = empirical_mean(&sampler, 3, 50_000);
            assert_abs_diff_eq!(observed, mean, epsilon = 0.05 * mean.max(1.0));
        }
    }

    #[test]
    fn test_poisson_mean_converges() {
        for mean in [0.1, 1.0, 2.5] {
            let sampler = PairGenerationSampler::new(PhotonStatistics::Poisson, mean).unwrap();
            let observed = empirical_mean(&sampler, 5, 50_000);
            assert_abs_diff_eq!(observed, mean, epsilon = 0.05 * mean.max(1.0));
        }
    }

    #[test]
    fn test_thermal_variance_exceeds_poisson() {
        // Var = m(1+m) for thermal, m for Poisson
        let mean = 1.0;
        let n = 50_000;
        let variance = |stats| {
            let sampler = PairGenerationSampler::new(stats, mean).unwrap();
            let mut rng = EntityRng::seeded(9);
            let draws: Vec<f64> = (0..n).map(|_| sampler.sample(&mut rng) as f64).collect();
            let mu = draws.iter().sum::<f64>() / n as f64;
            draws.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / n as f64
        };

        assert_abs_diff_eq!(variance(PhotonStatistics::Thermal), 2.0, epsilon = 0.15);
        assert_abs_diff_eq!(variance(PhotonStatistics::Poisson), 1.0, epsilon = 0.1);
    }

    #[test]
    fn test_zero_mean_yields_zero() {
        let mut rng = EntityRng::seeded(1);
        for stats in [PhotonStatistics::Thermal, PhotonStatistics::Poisson] {
            let sampler = PairGenerationSampler::new(stats, 0.0).unwrap();
            assert!((0..1000).all(|_| sampler.sample(&mut rng) == 0));
        }
    }

    #[test]
    fn test_invalid_inputs_rejected_at_construction() {
        assert!(PairGenerationSampler::from_mode("uniform", 0.1)
            .unwrap_err()
            .is_configuration_error());
        assert!(PairGenerationSampler::new(PhotonStatistics::Thermal, -1.0).is_err());
        assert!(PairGenerationSampler::new(PhotonStatistics::Poisson, f64::INFINITY).is_err());
    }

    #[test]
    fn test_reproducible() {
        let sampler = PairGenerationSampler::from_mode("thermal", 0.5).unwrap();
        let mut a = EntityRng::seeded(77);
        let mut b = EntityRng::seeded(77);
        let xs: Vec<u64> = (0..100).map(|_| sampler.sample(&mut a)).collect();
        let ys: Vec<u64> = (0..100).map(|_| sampler.sample(&mut b)).collect();
        assert_eq!(xs, ys);
    }
}
