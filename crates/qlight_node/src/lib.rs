//! # QLIGHT Node
//!
//! Composition nodes built from sources and wave plates: the SPDC source
//! node with labelled ports and timestamp export, and the polarization
//! analyzer (half-wave plate plus detector).
//!
//! ## Gantree Architecture
//!
//! ```text
//! qlight_node // L5: Node (완료)
//!     SourceNodeConfig // JSON 설정, 숫자 문자열 허용 (완료)
//!     SourceNode // SPDC + 포트 + 중계 (완료)
//!         SourcePort // 라벨 부여 (완료)
//!         SourceNodeRelay // 방출 수, 타임스탬프, 라우팅 (완료)
//!     PolarizationAnalyzer // HWP + 검출기 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qlight_node::prelude::*;
//!
//! let mut timeline = Timeline::new().with_seed(1);
//! let config = SourceNodeConfig::from_json(r#"{"bell_state": "psi+", "frequency": "1e6"}"#)
//!     .unwrap();
//! let mut source = SourceNode::build("source", &config, &mut timeline).unwrap();
//!
//! let analyzer = PolarizationAnalyzer::build(
//!     "analyzer",
//!     std::f64::consts::FRAC_PI_8,
//!     Some(Subsystem::Signal),
//!     &mut timeline,
//! )
//! .unwrap();
//! source.connect(&mut timeline, 0, analyzer.input()).unwrap();
//! timeline.init().unwrap();
//!
//! source.emit_pulses(&mut timeline, 1000).unwrap();
//! timeline.run().unwrap();
//!
//! let detected = analyzer.detection_count(&timeline).unwrap() as u64;
//! assert_eq!(detected, source.emission_count(&timeline).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Node configuration (Gantree: L5_Node → SourceNodeConfig)
pub mod config;

/// Source node (Gantree: L5_Node → SourceNode)
pub mod source_node;

/// Polarization analyzer (Gantree: L5_Node → PolarizationAnalyzer)
pub mod analyzer;

// ============================================================================
// Re-exports
// ============================================================================

pub use analyzer::{AnalyzerInput, PolarizationAnalyzer};
pub use config::SourceNodeConfig;
pub use source_node::{SourceNode, SourceNodeRelay, SourcePort};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::analyzer::PolarizationAnalyzer;
    pub use crate::config::SourceNodeConfig;
    pub use crate::source_node::{SourceNode, SourceNodeRelay, SourcePort};
    pub use qlight_optics::{PlateType, WavePlate, WavePlateConfig};
    pub use qlight_source::prelude::*;
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
