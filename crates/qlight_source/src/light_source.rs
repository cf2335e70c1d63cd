//! Single-photon light source
//!
//! Gantree: L3_Source → LightSource
//!
//! A weak laser: per cycle it draws a photon count, optionally flips the
//! phase of the cycle's qubit, and schedules one delivery per photon at the
//! cycle's base time.

use crate::config::LightSourceConfig;
use crate::sampler::PairGenerationSampler;
use qlight_core::{time, Photon, QlightResult, QuantumManager, QubitState};
use qlight_kernel::{expect_receivers, EntityId, EntityRng, RoutingHints, Timeline};
use std::fmt;

/// Single-photon emitter
/// Gantree: LightSource // 단일 광원
#[derive(Debug, Clone)]
pub struct LightSource {
    /// Source name
    name: String,

    /// Gantree: config: LightSourceConfig // 설정
    config: LightSourceConfig,

    /// Gantree: sampler: PairGenerationSampler // 광자 수 샘플러
    sampler: PairGenerationSampler,

    /// Private random stream
    rng: EntityRng,

    /// Downstream entities (exactly one)
    receivers: Vec<EntityId>,

    /// Photons emitted so far
    /// Gantree: photon_counter: u64 // 방출 수
    photon_counter: u64,
}

impl LightSource {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a source
    ///
    /// Without an explicit seed the stream is derived from the timeline's
    /// master seed and `name`.
    pub fn new(
        name: impl Into<String>,
        config: LightSourceConfig,
        timeline: &Timeline,
    ) -> QlightResult<Self> {
        config.validate()?;
        let name = name.into();
        let sampler = PairGenerationSampler::new(config.statistics, config.mean_photon_num)?;
        let rng = match config.seed {
            Some(seed) => EntityRng::seeded(seed),
            None => timeline.rng_for(&name),
        };

        Ok(Self {
            name,
            config,
            sampler,
            rng,
            receivers: Vec::new(),
            photon_counter: 0,
        })
    }

    // ========================================================================
    // Wiring
    // ========================================================================

    /// Connect a receiver
    pub fn add_receiver(&mut self, receiver: EntityId) {
        self.receivers.push(receiver);
    }

    /// Connected receivers
    pub fn receivers(&self) -> &[EntityId] {
        &self.receivers
    }

    /// Check that exactly one receiver is connected
    pub fn init(&self) -> QlightResult<()> {
        expect_receivers(&self.name, &self.receivers, 1)
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Emit one cycle per entry of `states`
    /// Gantree: emit(timeline,states) -> Result<()> // 방출
    ///
    /// Cycle `i` is scheduled at `now + i * round(1e12 / frequency)`. Every
    /// state is checked before the first cycle is scheduled.
    pub fn emit(&mut self, timeline: &mut Timeline, states: &[QubitState]) -> QlightResult<()> {
        self.init()?;
        for state in states {
            QuantumManager::check_state(state)?;
        }
        let receiver = self.receivers[0];
        log::info!("{} emitting {} photons", self.name, states.len());

        let start = timeline.now();
        let period = time::period_ticks(self.config.frequency_hz);

        for (i, state) in states.iter().enumerate() {
            let num_photons = self.sampler.sample(&mut self.rng);

            let mut state = *state;
            if self.rng.chance(self.config.phase_error) {
                state[1] = -state[1];
            }

            let cycle_time = start + i as u64 * period;
            for _ in 0..num_photons {
                let wavelength = self.config.linewidth_nm * self.rng.standard_normal()
                    + self.config.wavelength_nm;

                let qm = timeline.quantum_manager_mut();
                let (id, key) = qm.allocate();
                qm.set(&[key], state.to_vec())?;

                let photon = Photon::new(id, key, self.config.encoding)
                    .with_label(i.to_string())
                    .with_wavelength(wavelength)
                    .with_origin(cycle_time, self.name.as_str());
                timeline.schedule(cycle_time, receiver, photon, RoutingHints::NONE)?;
                self.photon_counter += 1;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Source name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration
    pub fn config(&self) -> &LightSourceConfig {
        &self.config
    }

    /// Photons emitted so far
    pub fn photon_counter(&self) -> u64 {
        self.photon_counter
    }
}

impl fmt::Display for LightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LightSource('{}', {:.3e} Hz, {}, emitted={})",
            self.name, self.config.frequency_hz, self.sampler, self.photon_counter
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
