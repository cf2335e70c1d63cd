//! # QLIGHT Core
//!
//! Photons, joint quantum states, and foundation types for simulating
//! quantum light sources inside a discrete-event network simulator.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qlight_core // L0+L1: Foundation + State (완료)
//!     L0_Foundation // 기반 타입/상수/에러 (완료)
//!         CoreTypes // SimTime, Encoding, Subsystem, Probability (완료)
//!         Constants // 시간 단위, 기본값, 기준 상태 (완료)
//!         Errors // 에러 타입 (완료)
//!     L1_State // 양자 상태 (완료)
//!         Operator // 복소 행렬, 텐서곱 (완료)
//!         Photon // 광자 토큰 (완료)
//!         QuantumManager // 결합 상태 아레나 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qlight_core::prelude::*;
//!
//! let mut qm = QuantumManager::new(1).unwrap();
//! let (id0, k0) = qm.allocate();
//! let (id1, k1) = qm.allocate();
//!
//! // Two photons bound to one Bell state
//! qm.set(&[k0, k1], states::PSI_PLUS.to_vec()).unwrap();
//! let signal = Photon::new(id0, k0, Encoding::Polarization).with_label("0");
//! let idler = Photon::new(id1, k1, Encoding::Polarization).with_label("1");
//!
//! assert_eq!(qm.partners(signal.state_key()).unwrap(), vec![idler.state_key()]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Dense operators (Gantree: L1_State → Operator)
pub mod operator;

/// Photon token (Gantree: L1_State → Photon)
pub mod photon;

/// Joint-state arena (Gantree: L1_State → QuantumManager)
pub mod quantum_manager;

// ============================================================================
// Re-exports
// ============================================================================

pub use constants::{defaults, states, time};
pub use error::{QlightError, QlightResult};
pub use operator::{total_probability, Operator};
pub use photon::Photon;
pub use quantum_manager::{QuantumManager, QuantumStateSlot};
pub use types::{
    qubit, Amplitude, Encoding, PhotonId, Probability, QubitState, SimTime, StateKey, Subsystem,
};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qlight_core::prelude::*;
    //! ```

    pub use crate::constants::{defaults, states, time};
    pub use crate::error::{QlightError, QlightResult};
    pub use crate::operator::{total_probability, Operator};
    pub use crate::photon::Photon;
    pub use crate::quantum_manager::{QuantumManager, QuantumStateSlot};
    pub use crate::types::{
        qubit, Amplitude, Encoding, PhotonId, Probability, QubitState, SimTime, StateKey,
        Subsystem,
    };
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
