//! # QLIGHT Kernel
//!
//! Deterministic discrete-event kernel: a picosecond timeline, the entity
//! protocol photons are delivered through, and seeded per-entity random
//! streams.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qlight_kernel // L2: Kernel (완료)
//!     Entity // 수신자 프로토콜 (완료)
//!     Event // (time, seq) 정렬 이벤트 (완료)
//!     Timeline // 이벤트 큐 + 개체 아레나 + 상태 관리자 (완료)
//!     EntityRng // ChaCha8 개체별 난수 (완료)
//!     PhotonRecorder // 종단 수신기 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qlight_kernel::prelude::*;
//!
//! let mut timeline = Timeline::new().with_seed(7);
//! let detector = timeline.add_entity(Box::new(PhotonRecorder::new("detector")));
//!
//! let (id, key) = timeline.quantum_manager_mut().allocate();
//! timeline
//!     .quantum_manager_mut()
//!     .set(&[key], qubit(1.0, 0.0).to_vec())
//!     .unwrap();
//! let photon = Photon::new(id, key, Encoding::Polarization);
//!
//! timeline.schedule(10_000, detector, photon, RoutingHints::NONE).unwrap();
//! timeline.run().unwrap();
//!
//! let recorder = timeline.entity::<PhotonRecorder>(detector).unwrap();
//! assert_eq!(recorder.arrival_times(), vec![10_000]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Entity protocol (Gantree: L2_Kernel → Entity)
pub mod entity;

/// Delivery events (Gantree: L2_Kernel → Event)
pub mod event;

/// Timeline (Gantree: L2_Kernel → Timeline)
pub mod timeline;

/// Random streams (Gantree: L2_Kernel → EntityRng)
pub mod rng;

/// Photon sink (Gantree: L2_Kernel → PhotonRecorder)
pub mod recorder;

// ============================================================================
// Re-exports
// ============================================================================

pub use entity::{expect_receivers, Entity, EntityId, RoutingHints};
pub use event::Event;
pub use recorder::{PhotonRecorder, Reception};
pub use rng::EntityRng;
pub use timeline::Timeline;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::entity::{expect_receivers, Entity, EntityId, RoutingHints};
    pub use crate::recorder::{PhotonRecorder, Reception};
    pub use crate::rng::EntityRng;
    pub use crate::timeline::Timeline;
    pub use qlight_core::prelude::*;
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
    use std::any::Any;

    /// Applies a fixed operator to the signal half of a pair, then forwards
    struct SignalFlip {
        target: EntityId,
    }

    impl Entity for SignalFlip {
        fn name(&self) -> &str {
            "flip"
        }

        fn get(
            &mut self,
            photon: Photon,
            hints: &RoutingHints,
            timeline: &mut Timeline,
        ) -> QlightResult<()> {
            let one = Amplitude::new(1.0, 0.0);
            let zero = Amplitude::new(0.0, 0.0);
            let x = Operator::from_2x2([[zero, one], [one, zero]]);
            timeline
                .quantum_manager_mut()
                .apply_operator(photon.state_key(), &x.kron(&Operator::identity(2)))?;
            timeline.deliver(self.target, photon, *hints)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_partner_sees_transform() {
        let mut tl = Timeline::new();
        let rec_a = tl.add_entity(Box::new(PhotonRecorder::new("a")));
        let rec_b = tl.add_entity(Box::new(PhotonRecorder::new("b")));
        let flip = tl.add_entity(Box::new(SignalFlip { target: rec_a }));
        tl.init().unwrap();

        let qm = tl.quantum_manager_mut();
        let (id0, k0) = qm.allocate();
        let (id1, k1) = qm.allocate();
        qm.set(&[k0, k1], states::PHI_PLUS.to_vec()).unwrap();

        let signal = Photon::new(id0, k0, Encoding::Polarization).with_label("0");
        let idler = Photon::new(id1, k1, Encoding::Polarization).with_label("1");
        tl.schedule(100, flip, signal, RoutingHints::NONE).unwrap();
        tl.schedule(100, rec_b, idler, RoutingHints::NONE).unwrap();
        assert_eq!(tl.run().unwrap(), 2);

        // Idler arrives after the flip and sees Ψ+
        let idler_view = &tl.entity::<PhotonRecorder>(rec_b).unwrap().log()[0];
        for (a, b) in idler_view.amplitudes.iter().zip(states::PSI_PLUS.iter()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-12);
        }
        assert_eq!(tl.entity::<PhotonRecorder>(rec_a).unwrap().count(), 1);
    }

    #[test]
    fn test_seeded_entity_streams() {
        let tl = Timeline::new().with_seed(11);
        let mut a = tl.rng_for("source");
        let mut b = Timeline::new().with_seed(11).rng_for("source");
        assert_eq!(a.uniform(), b.uniform());
    }

    #[test]
    fn test_truncation_configured() {
        let tl = Timeline::with_truncation(3).unwrap();
        assert_eq!(tl.quantum_manager().fock_dim(), 4);
        assert!(Timeline::with_truncation(0).is_err());
    }
}
