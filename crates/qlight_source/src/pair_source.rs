//! Entangled-pair source (SPDC family)
//!
//! Gantree: L3_Source → PairSource
//!
//! Per cycle: sample a pair count, build the joint state, bind two photons to
//! one shared slot, and enqueue both deliveries at the cycle's base time.

use crate::config::PairSourceConfig;
use crate::pair_encoding::PairEncoding;
use crate::sampler::PairGenerationSampler;
use qlight_core::{time, Photon, QlightError, QlightResult, QuantumManager, QubitState, SimTime};
use qlight_kernel::{expect_receivers, EntityId, EntityRng, RoutingHints, Timeline};
use std::fmt;

/// Entangled photon-pair emitter
/// Gantree: PairSource // 쌍 광원
#[derive(Debug, Clone)]
pub struct PairSource {
    name: String,
    config: PairSourceConfig,

    /// Gantree: encoding: PairEncoding // 결합 상태 전략
    encoding: PairEncoding,

    /// Gantree: sampler: PairGenerationSampler // 쌍 수 샘플러
    sampler: PairGenerationSampler,

    rng: EntityRng,

    /// Signal and idler receivers, in that order
    receivers: Vec<EntityId>,

    /// Set by a successful `init`
    initialized: bool,

    /// Real pairs emitted so far (null placeholders excluded)
    /// Gantree: photon_counter: u64 // 방출 쌍 수
    photon_counter: u64,
}

impl PairSource {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a pair source
    /// Gantree: new(name,config,timeline) -> Result<Self> // 생성
    pub fn new(
        name: impl Into<String>,
        config: PairSourceConfig,
        timeline: &Timeline,
    ) -> QlightResult<Self> {
        config.validate()?;
        let name = name.into();
        let encoding = config.pair_encoding()?;
        let sampler =
            PairGenerationSampler::new(config.effective_statistics(), config.mean_photon_num)?;
        let rng = match config.seed {
            Some(seed) => EntityRng::seeded(seed),
            None => timeline.rng_for(&name),
        };

        Ok(Self {
            name,
            config,
            encoding,
            sampler,
            rng,
            receivers: Vec::new(),
            initialized: false,
            photon_counter: 0,
        })
    }

    // ========================================================================
    // Wiring
    // ========================================================================

    /// Connect a receiver (first = signal, second = idler)
    pub fn add_receiver(&mut self, receiver: EntityId) {
        self.receivers.push(receiver);
        self.initialized = false;
    }

    /// Connected receivers
    pub fn receivers(&self) -> &[EntityId] {
        &self.receivers
    }

    /// Check that exactly two receivers are connected
    /// Gantree: init() -> Result<()> // 연결 검증
    pub fn init(&mut self) -> QlightResult<()> {
        expect_receivers(&self.name, &self.receivers, 2)?;
        self.initialized = true;
        Ok(())
    }

    fn ensure_ready(&self) -> QlightResult<()> {
        expect_receivers(&self.name, &self.receivers, 2)?;
        if !self.initialized {
            return Err(QlightError::NotInitialized(self.name.clone()));
        }
        Ok(())
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Emit one cycle per entry of `states`
    /// Gantree: emit(timeline,states) -> Result<()> // 방출
    ///
    /// Polarization pairs take their qubit from `states`, all of which are
    /// checked before the first cycle is scheduled; the other encodings only
    /// use its length.
    pub fn emit(&mut self, timeline: &mut Timeline, states: &[QubitState]) -> QlightResult<()> {
        self.ensure_ready()?;
        if self.encoding.needs_states() {
            for state in states {
                QuantumManager::check_state(state)?;
            }
        }
        log::info!(
            "{} ({}) emitting {} cycles",
            self.name,
            self.encoding,
            states.len()
        );

        let start = timeline.now();
        for (n, state) in states.iter().enumerate() {
            self.emit_cycle(timeline, start, n as u64, Some(state))?;
        }
        Ok(())
    }

    /// Emit `num_pulses` cycles of a state-free encoding
    /// Gantree: emit_pulses(timeline,n) -> Result<()> // 펄스 방출
    pub fn emit_pulses(&mut self, timeline: &mut Timeline, num_pulses: usize) -> QlightResult<()> {
        self.ensure_ready()?;
        if self.encoding.needs_states() {
            return Err(QlightError::InvalidConfiguration(format!(
                "{} emits polarization pairs from caller states; use emit",
                self.name
            )));
        }
        log::info!(
            "{} ({}) emitting {} pulses",
            self.name,
            self.encoding,
            num_pulses
        );

        let start = timeline.now();
        for n in 0..num_pulses {
            self.emit_cycle(timeline, start, n as u64, None)?;
        }
        Ok(())
    }

    fn emit_cycle(
        &mut self,
        timeline: &mut Timeline,
        start: SimTime,
        cycle: u64,
        input: Option<&QubitState>,
    ) -> QlightResult<()> {
        let count = self.encoding.sample_count(&self.sampler, &mut self.rng);

        let mut input = input.copied();
        if self.encoding.uses_phase_error() && self.rng.chance(self.config.phase_error) {
            if let Some(state) = input.as_mut() {
                state[1] = -state[1];
            }
        }

        let cycle_time = time::cycle_time(start, cycle, self.config.frequency_hz);
        let (pairs, is_null) = self.encoding.dispatch_plan(count);
        let truncation = timeline.quantum_manager().truncation();

        for _ in 0..pairs {
            let amplitudes = self.encoding.build_joint_state(
                count,
                input.as_ref(),
                self.config.mean_photon_num,
                truncation,
            )?;

            let qm = timeline.quantum_manager_mut();
            let (id0, key0) = qm.allocate();
            let (id1, key1) = qm.allocate();
            qm.set(&[key0, key1], amplitudes)?;

            let tag = self.encoding.encoding();
            let [w0, w1] = self.config.wavelengths_nm;
            let signal = Photon::new(id0, key0, tag)
                .with_wavelength(w0)
                .with_origin(cycle_time, self.name.as_str())
                .with_null(is_null);
            let idler = Photon::new(id1, key1, tag)
                .with_wavelength(w1)
                .with_origin(cycle_time, self.name.as_str())
                .with_null(is_null);

            self.send_photons(timeline, cycle_time, [signal, idler])?;
            if !is_null {
                self.photon_counter += 1;
            }
        }
        Ok(())
    }

    /// Enqueue both photons of a pair at the same time
    /// Gantree: send_photons(timeline,time,[Photon;2]) -> Result<()> // 쌍 전달
    fn send_photons(
        &self,
        timeline: &mut Timeline,
        time: SimTime,
        photons: [Photon; 2],
    ) -> QlightResult<()> {
        log::debug!(
            "{} sending photons to {:?} at time {}",
            self.name,
            self.receivers,
            time
        );
        for (receiver, photon) in self.receivers.iter().zip(photons) {
            timeline.schedule(time, *receiver, photon, RoutingHints::NONE)?;
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Set the wavelengths of the two output modes (nm)
    pub fn set_wavelengths(&mut self, signal_nm: f64, idler_nm: f64) {
        self.config.wavelengths_nm = [signal_nm, idler_nm];
    }

    /// Wavelengths of the two output modes (nm)
    pub fn wavelengths(&self) -> [f64; 2] {
        self.config.wavelengths_nm
    }

    /// Source name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pair encoding
    pub fn encoding(&self) -> PairEncoding {
        self.encoding
    }

    /// Configuration
    pub fn config(&self) -> &PairSourceConfig {
        &self.config
    }

    /// Real pairs emitted so far
    pub fn photon_counter(&self) -> u64 {
        self.photon_counter
    }
}

impl fmt::Display for PairSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PairSource('{}', {}, {:.3e} Hz, {}, pairs={})",
            self.name, self.encoding, self.config.frequency_hz, self.sampler, self.photon_counter
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
