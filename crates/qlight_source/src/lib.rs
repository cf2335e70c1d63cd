//! # QLIGHT Source
//!
//! Stochastic light sources: a weak-laser single-photon source and the SPDC
//! family of entangled-pair sources (polarization, Bell, Fock, absorptive).
//!
//! ## Gantree Architecture
//!
//! ```text
//! qlight_source // L3: Source (완료)
//!     SourceConfig // 광원 설정, 광자 통계 (완료)
//!     PairGenerationSampler // 열/푸아송 샘플러 (완료)
//!     PairEncoding // 결합 상태 전략 (완료)
//!         BellState // phi+/phi-/psi+/psi- (완료)
//!         tmsv_state // 절단 압축 진공 (완료)
//!     LightSource // 단일 광원 (완료)
//!     PairSource // SPDC 쌍 광원 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qlight_source::prelude::*;
//!
//! let mut timeline = Timeline::new().with_seed(42);
//! let alice = timeline.add_entity(Box::new(PhotonRecorder::new("alice")));
//! let bob = timeline.add_entity(Box::new(PhotonRecorder::new("bob")));
//!
//! let config = PairSourceConfig::bell(BellState::PsiPlus).with_mean_photon_num(0.5);
//! let mut spdc = PairSource::new("spdc", config, &timeline).unwrap();
//! spdc.add_receiver(alice);
//! spdc.add_receiver(bob);
//! spdc.init().unwrap();
//!
//! spdc.emit_pulses(&mut timeline, 100).unwrap();
//! timeline.run().unwrap();
//!
//! let pairs = timeline.entity::<PhotonRecorder>(alice).unwrap().count();
//! assert_eq!(pairs as u64, spdc.photon_counter());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Source configuration (Gantree: L3_Source → SourceConfig)
pub mod config;

/// Count sampler (Gantree: L3_Source → PairGenerationSampler)
pub mod sampler;

/// Pair encodings (Gantree: L3_Source → PairEncoding)
pub mod pair_encoding;

/// Single-photon source (Gantree: L3_Source → LightSource)
pub mod light_source;

/// Entangled-pair source (Gantree: L3_Source → PairSource)
pub mod pair_source;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{LightSourceConfig, PairSourceConfig, PhotonStatistics};
pub use light_source::LightSource;
pub use pair_encoding::{tmsv_state, BellState, PairEncoding};
pub use pair_source::PairSource;
pub use sampler::PairGenerationSampler;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::config::{LightSourceConfig, PairSourceConfig, PhotonStatistics};
    pub use crate::light_source::LightSource;
    pub use crate::pair_encoding::{tmsv_state, BellState, PairEncoding};
    pub use crate::pair_source::PairSource;
    pub use crate::sampler::PairGenerationSampler;
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
