//! Wave plate entity
//!
//! Gantree: L4_Optics → WavePlate
//!
//! Applies a Jones matrix to the state slot of every polarization photon it
//! receives, embedded into the pair space when the slot is shared, then
//! forwards the photon to its single receiver.

use crate::jones::{embed, PlateType};
use qlight_core::{Encoding, Operator, Photon, Probability, QlightError, QlightResult};
use qlight_kernel::{expect_receivers, Entity, EntityId, EntityRng, RoutingHints, Timeline};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

// ============================================================================
// WavePlateConfig
// ============================================================================

/// Wave plate configuration
/// Gantree: WavePlateConfig // 파장판 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavePlateConfig {
    /// Retardance
    /// Gantree: plate_type: PlateType // HWP/QWP
    pub plate_type: PlateType,

    /// Fast-axis angle (radians)
    /// Gantree: angle: f64 // 각도
    pub angle: f64,

    /// Probability that the transform is applied
    /// Gantree: fidelity: Probability // 충실도
    pub fidelity: Probability,

    /// Accepted photon encoding
    pub encoding: Encoding,

    /// Random seed (derived from the timeline when absent)
    pub seed: Option<u64>,
}

impl Default for WavePlateConfig {
    fn default() -> Self {
        Self {
            plate_type: PlateType::HalfWave,
            angle: 0.0,
            fidelity: Probability::ONE,
            encoding: Encoding::Polarization,
            seed: None,
        }
    }
}

impl WavePlateConfig {
    /// Half-wave plate at `angle` radians
    pub fn half_wave(angle: f64) -> Self {
        Self {
            angle,
            ..Self::default()
        }
    }

    /// Quarter-wave plate at `angle` radians
    pub fn quarter_wave(angle: f64) -> Self {
        Self {
            plate_type: PlateType::QuarterWave,
            angle,
            ..Self::default()
        }
    }

    /// Set fidelity
    pub fn with_fidelity(mut self, fidelity: f64) -> QlightResult<Self> {
        self.fidelity = Probability::new(fidelity)?;
        Ok(self)
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> QlightResult<()> {
        if !self.angle.is_finite() {
            return Err(QlightError::InvalidConfiguration(format!(
                "wave plate angle must be finite, got {}",
                self.angle
            )));
        }
        if self.encoding != Encoding::Polarization {
            return Err(QlightError::UnsupportedEncoding {
                component: "wave plate".into(),
                encoding: self.encoding.name().into(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// WavePlate
// ============================================================================

/// Jones-matrix optical element
/// Gantree: WavePlate // 파장판
#[derive(Debug, Clone)]
pub struct WavePlate {
    name: String,
    config: WavePlateConfig,

    /// Cached Jones matrix for the current angle
    jones: Operator,

    rng: EntityRng,
    receivers: Vec<EntityId>,

    /// Photons the plate transformed / let through untouched
    applied: u64,
    skipped: u64,
}

impl WavePlate {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a wave plate
    pub fn new(
        name: impl Into<String>,
        config: WavePlateConfig,
        timeline: &Timeline,
    ) -> QlightResult<Self> {
        config.validate()?;
        let name = name.into();
        let rng = match config.seed {
            Some(seed) => EntityRng::seeded(seed),
            None => timeline.rng_for(&name),
        };
        let jones = config.plate_type.jones(config.angle);

        Ok(Self {
            name,
            config,
            jones,
            rng,
            receivers: Vec::new(),
            applied: 0,
            skipped: 0,
        })
    }

    /// Set receiver (builder form)
    pub fn with_receiver(mut self, receiver: EntityId) -> Self {
        self.receivers.push(receiver);
        self
    }

    // ========================================================================
    // Control
    // ========================================================================

    /// Connect a receiver
    pub fn add_receiver(&mut self, receiver: EntityId) {
        self.receivers.push(receiver);
    }

    /// Rotate the fast axis to `angle` radians
    /// Gantree: set_angle(theta) // 각도 변경
    pub fn set_angle(&mut self, angle: f64) {
        self.config.angle = angle;
        self.jones = self.config.plate_type.jones(angle);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Fast-axis angle (radians)
    pub fn angle(&self) -> f64 {
        self.config.angle
    }

    /// Retardance
    pub fn plate_type(&self) -> PlateType {
        self.config.plate_type
    }

    /// Current Jones matrix
    pub fn jones(&self) -> &Operator {
        &self.jones
    }

    /// Photons transformed so far
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Photons passed through untransformed by the fidelity gate
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Fidelity gate; certainty consumes no draw
    fn passes_gate(&mut self) -> bool {
        let fidelity = self.config.fidelity;
        fidelity.is_certain() || self.rng.chance(fidelity.value())
    }
}

impl Entity for WavePlate {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) -> QlightResult<()> {
        expect_receivers(&self.name, &self.receivers, 1)
    }

    /// Gantree: get(photon,hints) -> Result<()> // 변환 후 전달
    fn get(
        &mut self,
        photon: Photon,
        hints: &RoutingHints,
        timeline: &mut Timeline,
    ) -> QlightResult<()> {
        expect_receivers(&self.name, &self.receivers, 1)?;
        if photon.encoding() != self.config.encoding {
            return Err(QlightError::EncodingMismatch {
                expected: self.config.encoding.name().into(),
                actual: photon.encoding().name().into(),
            });
        }

        let key = photon.state_key();
        let dim = timeline.quantum_manager().get(key)?.dim();
        let operator = embed(&self.jones, dim, hints.which)?;

        if self.passes_gate() {
            timeline.quantum_manager_mut().apply_operator(key, &operator)?;
            self.applied += 1;
            log::trace!(
                "{} applied {} at {:.4} rad to {} (dim {})",
                self.name,
                self.config.plate_type,
                self.config.angle,
                photon.id(),
                dim
            );
        } else {
            self.skipped += 1;
            log::warn!(
                "{} let {} through untransformed (fidelity {})",
                self.name,
                photon.id(),
                self.config.fidelity
            );
        }

        timeline.deliver(self.receivers[0], photon, *hints)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Display for WavePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WavePlate('{}', {}, θ={:.4}, fidelity={})",
            self.name, self.config.plate_type, self.config.angle, self.config.fidelity
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use qlight_core::{qubit, states, Amplitude, Subsystem};
    use qlight_kernel::PhotonRecorder;
    use std::f64::consts::FRAC_PI_4;

    struct Bench {
        tl: Timeline,
        plate: EntityId,
        det: EntityId,
    }

    fn bench(config: WavePlateConfig) -> Bench {
        let mut tl = Timeline::new().with_seed(8);
        let det = tl.add_entity(Box::new(PhotonRecorder::new("det")));
        let plate = WavePlate::new("wp", config, &tl).unwrap().with_receiver(det);
        let plate = tl.add_entity(Box::new(plate));
        tl.init().unwrap();
        Bench { tl, plate, det }
    }

    fn single(tl: &mut Timeline, state: Vec<Amplitude>, encoding: Encoding) -> Photon {
        let qm = tl.quantum_manager_mut();
        let (id, key) = qm.allocate();
        qm.set(&[key], state).unwrap();
        Photon::new(id, key, encoding)
    }

    fn pair(tl: &mut Timeline, state: [Amplitude; 4]) -> (Photon, Photon) {
        let qm = tl.quantum_manager_mut();
        let (id0, k0) = qm.allocate();
        let (id1, k1) = qm.allocate();
        qm.set(&[k0, k1], state.to_vec()).unwrap();
        (
            Photon::new(id0, k0, Encoding::Polarization),
            Photon::new(id1, k1, Encoding::Polarization),
        )
    }

    #[test]
    fn test_init_requires_one_receiver() {
        let mut tl = Timeline::new();
        let plate = WavePlate::new("wp", WavePlateConfig::default(), &tl).unwrap();
        tl.add_entity(Box::new(plate));
        assert_eq!(tl.init().unwrap_err(), QlightError::wiring("wp", 1, 0));
    }

    #[test]
    fn test_single_photon_rotated_and_forwarded() {
        let mut b = bench(WavePlateConfig::half_wave(FRAC_PI_4));
        let p = single(&mut b.tl, qubit(1.0, 0.0).to_vec(), Encoding::Polarization);
        b.tl.schedule(10, b.plate, p, RoutingHints::NONE).unwrap();
        b.tl.run().unwrap();

        let log = b.tl.entity::<PhotonRecorder>(b.det).unwrap().log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].time, 10);
        assert_relative_eq!(log[0].amplitudes[0].re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(log[0].amplitudes[1].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_signal_transform_visible_to_idler() {
        // HWP at π/4 is X: X⊗I |Φ+⟩ = |Ψ+⟩
        let mut b = bench(WavePlateConfig::half_wave(FRAC_PI_4));
        let (signal, idler) = pair(&mut b.tl, states::PHI_PLUS);
        let idler_key = idler.state_key();
        b.tl.schedule(0, b.plate, signal, RoutingHints::which(Subsystem::Signal))
            .unwrap();
        b.tl.run().unwrap();

        let amps = b.tl.quantum_manager().amplitudes(idler_key).unwrap();
        for (a, e) in amps.iter().zip(states::PSI_PLUS.iter()) {
            assert_relative_eq!(a.re, e.re, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_idler_and_both_targets() {
        let mut b = bench(WavePlateConfig::half_wave(FRAC_PI_4));
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);

        // |HH⟩ with idler flipped -> |HV⟩
        let (_, idler) = pair(&mut b.tl, [one, zero, zero, zero]);
        b.tl.schedule(0, b.plate, idler, RoutingHints::which(Subsystem::Idler))
            .unwrap();
        b.tl.run().unwrap();

        // |HH⟩ with both flipped -> |VV⟩
        let (signal, _) = pair(&mut b.tl, [one, zero, zero, zero]);
        b.tl.schedule(1, b.plate, signal, RoutingHints::which(Subsystem::Both))
            .unwrap();
        b.tl.run().unwrap();

        let log = b.tl.entity::<PhotonRecorder>(b.det).unwrap().log();
        assert_relative_eq!(log[0].amplitudes[1].re, 1.0);
        assert_relative_eq!(log[1].amplitudes[3].re, 1.0);
    }

    #[test]
    fn test_pair_without_target_is_ambiguous() {
        let mut b = bench(WavePlateConfig::half_wave(0.2));
        let (signal, _) = pair(&mut b.tl, states::PSI_MINUS);
        b.tl.schedule(0, b.plate, signal, RoutingHints::NONE).unwrap();
        assert_eq!(b.tl.run().unwrap_err(), QlightError::AmbiguousTarget(4));
    }

    #[test]
    fn test_unsupported_dimension() {
        let mut b = bench(WavePlateConfig::half_wave(0.2));
        let mut state = vec![Complex64::new(0.0, 0.0); 9];
        state[0] = Complex64::new(1.0, 0.0);
        let p = single(&mut b.tl, state, Encoding::Polarization);
        b.tl.schedule(0, b.plate, p, RoutingHints::which(Subsystem::Signal))
            .unwrap();
        assert_eq!(
            b.tl.run().unwrap_err(),
            QlightError::UnsupportedStateDimension(9)
        );
    }

    #[test]
    fn test_encoding_mismatch() {
        let mut b = bench(WavePlateConfig::half_wave(0.2));
        let p = single(&mut b.tl, qubit(1.0, 0.0).to_vec(), Encoding::Fock);
        b.tl.schedule(0, b.plate, p, RoutingHints::NONE).unwrap();
        assert!(matches!(
            b.tl.run().unwrap_err(),
            QlightError::EncodingMismatch { .. }
        ));
    }

    #[test]
    fn test_fidelity_gate() {
        let config = WavePlateConfig::half_wave(FRAC_PI_4)
            .with_fidelity(0.5)
            .unwrap();
        let mut b = bench(config);
        for t in 0..2000 {
            let p = single(&mut b.tl, qubit(1.0, 0.0).to_vec(), Encoding::Polarization);
            b.tl.schedule(t, b.plate, p, RoutingHints::NONE).unwrap();
        }
        b.tl.run().unwrap();

        let plate = b.tl.entity::<WavePlate>(b.plate).unwrap();
        assert_eq!(plate.applied() + plate.skipped(), 2000);
        let ratio = plate.applied() as f64 / 2000.0;
        assert!((ratio - 0.5).abs() < 0.05, "ratio = {}", ratio);

        // Untouched photons still arrive, in |H⟩
        let log = b.tl.entity::<PhotonRecorder>(b.det).unwrap().log();
        assert_eq!(log.len(), 2000);
        let untouched = log.iter().filter(|r| r.amplitudes[0].norm() > 0.5).count();
        assert_eq!(untouched as u64, plate.skipped());
    }

    #[test]
    fn test_zero_fidelity_never_applies() {
        let config = WavePlateConfig::half_wave(FRAC_PI_4)
            .with_fidelity(0.0)
            .unwrap();
        let mut b = bench(config);
        let p = single(&mut b.tl, qubit(1.0, 0.0).to_vec(), Encoding::Polarization);
        b.tl.schedule(0, b.plate, p, RoutingHints::NONE).unwrap();
        b.tl.run().unwrap();
        assert_eq!(b.tl.entity::<WavePlate>(b.plate).unwrap().applied(), 0);
    }

    #[test]
    fn test_set_angle_updates_matrix() {
        let mut b = bench(WavePlateConfig::half_wave(0.0));
        b.tl.entity_mut::<WavePlate>(b.plate)
            .unwrap()
            .set_angle(FRAC_PI_4);

        let plate = b.tl.entity::<WavePlate>(b.plate).unwrap();
        assert_eq!(plate.angle(), FRAC_PI_4);
        assert_relative_eq!(plate.jones().get(0, 1).re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_config_json() {
        let json = r#"{"plate_type": "QWP", "angle": 0.5, "fidelity": 0.9}"#;
        let config: WavePlateConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.plate_type, PlateType::QuarterWave);
        assert_relative_eq!(config.fidelity.value(), 0.9);

        let bad = r#"{"fidelity": 1.2}"#;
        assert!(serde_json::from_str::<WavePlateConfig>(bad).is_err());
        assert!(WavePlateConfig::half_wave(f64::NAN).validate().is_err());
    }
}
