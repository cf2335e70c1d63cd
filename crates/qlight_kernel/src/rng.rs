//! Per-entity random streams for QLIGHT
//!
//! Gantree: L2_Kernel → EntityRng
//!
//! Every source and element draws from its own stream, so replaying a seed
//! reproduces the same counts regardless of what other entities do.

use qlight_core::{QlightError, QlightResult};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Geometric, Poisson, StandardNormal};

/// Seeded random stream owned by one entity
/// Gantree: EntityRng // 개체별 난수
#[derive(Debug, Clone)]
pub struct EntityRng {
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl EntityRng {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Stream with an explicit seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Non-reproducible stream
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// Stream derived from a master seed and an entity name
    /// Gantree: for_entity(master,name) -> Self // 이름 기반 시드
    pub fn for_entity(master_seed: u64, name: &str) -> Self {
        Self::seeded(derive_seed(master_seed, name))
    }

    /// Seed used, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    // ========================================================================
    // Draws
    // ========================================================================

    /// Uniform draw in [0, 1)
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Standard normal deviate
    #[inline]
    pub fn standard_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// Bernoulli trial with success probability `p`
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// Failures before the first success, success probability `p`
    pub fn geometric(&mut self, p: f64) -> QlightResult<u64> {
        let dist = Geometric::new(p).map_err(|e| {
            QlightError::InvalidConfiguration(format!("geometric p={}: {}", p, e))
        })?;
        Ok(self.sample(&dist))
    }

    /// Poisson draw with rate `lambda` (zero rate yields zero)
    pub fn poisson(&mut self, lambda: f64) -> QlightResult<u64> {
        if lambda == 0.0 {
            return Ok(0);
        }
        let dist = Poisson::new(lambda).map_err(|e| {
            QlightError::InvalidConfiguration(format!("poisson rate={}: {}", lambda, e))
        })?;
        let draw: f64 = self.sample(&dist);
        Ok(draw as u64)
    }

    /// Sample a prepared distribution
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        dist.sample(&mut self.rng)
    }
}

/// FNV-1a over the name, mixed with the master seed
fn derive_seed(master_seed: u64, name: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in name.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash ^ master_seed.rotate_left(17)
}

// ============================================================================
// Tests
// ============================================================================
