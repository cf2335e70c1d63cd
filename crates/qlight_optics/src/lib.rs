//! # QLIGHT Optics
//!
//! Linear-optical elements acting on photon polarization: Jones matrices for
//! half- and quarter-wave plates, their tensor embedding into the space of an
//! entangled pair, and the wave plate entity.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qlight_optics // L4: Optics (완료)
//!     Jones // HWP/QWP 행렬, 텐서 확장 (완료)
//!     WavePlate // 변환 후 전달 개체 (완료)
//!         WavePlateConfig // 각도, 충실도 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qlight_optics::prelude::*;
//! use std::f64::consts::FRAC_PI_4;
//!
//! let mut timeline = Timeline::new();
//! let detector = timeline.add_entity(Box::new(PhotonRecorder::new("detector")));
//! let plate = WavePlate::new("hwp", WavePlateConfig::half_wave(FRAC_PI_4), &timeline)
//!     .unwrap()
//!     .with_receiver(detector);
//! let plate = timeline.add_entity(Box::new(plate));
//! timeline.init().unwrap();
//!
//! let (id, key) = timeline.quantum_manager_mut().allocate();
//! timeline
//!     .quantum_manager_mut()
//!     .set(&[key], qubit(1.0, 0.0).to_vec())
//!     .unwrap();
//! let photon = Photon::new(id, key, Encoding::Polarization);
//! timeline.schedule(0, plate, photon, RoutingHints::NONE).unwrap();
//! timeline.run().unwrap();
//!
//! // |H⟩ leaves a π/4 half-wave plate as |V⟩
//! let log = timeline.entity::<PhotonRecorder>(detector).unwrap().log();
//! assert!((log[0].amplitudes[1].re - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Jones matrices (Gantree: L4_Optics → Jones)
pub mod jones;

/// Wave plate entity (Gantree: L4_Optics → WavePlate)
pub mod wave_plate;

// ============================================================================
// Re-exports
// ============================================================================

pub use jones::{embed, half_wave, quarter_wave, PlateType};
pub use wave_plate::{WavePlate, WavePlateConfig};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::jones::{embed, half_wave, quarter_wave, PlateType};
    pub use crate::wave_plate::{WavePlate, WavePlateConfig};
    pub use qlight_kernel::prelude::*;
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_8;

    #[test]
    fn test_cascaded_plates_restore_state() {
        // Two identical half-wave plates in series act as identity
        let mut tl = Timeline::new();
        let det = tl.add_entity(Box::new(PhotonRecorder::new("det")));
        let second = WavePlate::new("hwp2", WavePlateConfig::half_wave(0.3), &tl)
            .unwrap()
            .with_receiver(det);
        let second = tl.add_entity(Box::new(second));
        let first = WavePlate::new("hwp1", WavePlateConfig::half_wave(0.3), &tl)
            .unwrap()
            .with_receiver(second);
        let first = tl.add_entity(Box::new(first));
        tl.init().unwrap();

        let qm = tl.quantum_manager_mut();
        let (id0, k0) = qm.allocate();
        let (_, k1) = qm.allocate();
        qm.set(&[k0, k1], states::PSI_MINUS.to_vec()).unwrap();
        let signal = Photon::new(id0, k0, Encoding::Polarization);

        tl.schedule(0, first, signal, RoutingHints::which(Subsystem::Signal))
            .unwrap();
        tl.run().unwrap();

        let amps = tl.quantum_manager().amplitudes(k1).unwrap();
        for (a, e) in amps.iter().zip(states::PSI_MINUS.iter()) {
            assert_relative_eq!(a.re, e.re, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_quarter_wave_preserves_norm_on_pairs() {
        let mut tl = Timeline::new();
        let det = tl.add_entity(Box::new(PhotonRecorder::new("det")));
        let plate = WavePlate::new("qwp", WavePlateConfig::quarter_wave(FRAC_PI_8), &tl)
            .unwrap()
            .with_receiver(det);
        let plate = tl.add_entity(Box::new(plate));

        let qm = tl.quantum_manager_mut();
        let (id0, k0) = qm.allocate();
        let (_, k1) = qm.allocate();
        qm.set(&[k0, k1], states::PHI_PLUS.to_vec()).unwrap();
        let signal = Photon::new(id0, k0, Encoding::Polarization);

        tl.schedule(0, plate, signal, RoutingHints::which(Subsystem::Both))
            .unwrap();
        tl.run().unwrap();

        let slot = tl.quantum_manager().get(k1).unwrap();
        assert_relative_eq!(slot.total_probability(), 1.0, epsilon = 1e-12);
    }
}
