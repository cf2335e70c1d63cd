//! Error types for QLIGHT
//!
//! Gantree: L0_Foundation → Errors
//!
//! Every error here describes a configuration or wiring defect. None of them
//! is transient, so callers are expected to stop the simulation rather than
//! retry.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QLIGHT
/// Gantree: QlightError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QlightError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Bad statistical mode, parameter range, or missing input
    /// Gantree: InvalidConfiguration(String) // 설정 오류
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Probability value out of range [0, 1]
    #[error("Invalid probability {0}: must be in range [0, 1]")]
    InvalidProbability(f64),

    /// Encoding name with no matching emission branch
    /// Gantree: UnsupportedEncoding{{component,encoding}} // 미지원 인코딩
    #[error("Component '{component}' does not support encoding '{encoding}'")]
    UnsupportedEncoding { component: String, encoding: String },

    // ========================================================================
    // Wiring Errors
    // ========================================================================
    /// Wrong number of receivers registered on an entity
    /// Gantree: WiringError{{entity,expected,actual}} // 연결 오류
    #[error("Wiring error on '{entity}': expected {expected} receiver(s), found {actual}")]
    WiringError {
        entity: String,
        expected: usize,
        actual: usize,
    },

    /// Source used before a successful `init`
    #[error("Entity '{0}' emitted before initialization")]
    NotInitialized(String),

    /// Photon routed to an element of a different encoding
    /// Gantree: EncodingMismatch{{expected,actual}} // 인코딩 불일치
    #[error("Encoding mismatch: element expects '{expected}', photon carries '{actual}'")]
    EncodingMismatch { expected: String, actual: String },

    // ========================================================================
    // State Errors
    // ========================================================================
    /// Two-photon state transformed without naming the target subsystem
    /// Gantree: AmbiguousTarget(dim) // 대상 미지정
    #[error("State of dimension {0} is shared; specify which = signal, idler or both")]
    AmbiguousTarget(usize),

    /// State vector dimension the element cannot act on
    /// Gantree: UnsupportedStateDimension(dim) // 차원 오류
    #[error("Unsupported state dimension {0}")]
    UnsupportedStateDimension(usize),

    /// Amplitude vector does not sum to unit probability
    #[error("State is not normalized: total probability {0:.9}")]
    NotNormalized(f64),

    /// Operator and state dimensions disagree
    #[error("Operator of dimension {operator} cannot act on state of dimension {state}")]
    DimensionMismatch { operator: usize, state: usize },

    /// State key not present in the quantum manager
    #[error("Unknown state key {0}")]
    UnknownStateKey(u64),

    // ========================================================================
    // Kernel Errors
    // ========================================================================
    /// Entity id not registered on the timeline
    #[error("Unknown entity {0}")]
    UnknownEntity(usize),

    /// Entity received a photon while it was already executing
    #[error("Re-entrant delivery to entity '{0}'")]
    ReentrantDelivery(String),

    /// Event scheduled before the current simulation time
    #[error("Cannot schedule event at {time} ps: timeline is at {now} ps")]
    ScheduleInPast { time: u64, now: u64 },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),
}

/// Result type alias for QLIGHT operations
/// Gantree: QlightResult<T> // type alias
pub type QlightResult<T> = Result<T, QlightError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QlightError {
    fn from(err: serde_json::Error) -> Self {
        QlightError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for QlightError {
    fn from(err: std::io::Error) -> Self {
        QlightError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QlightError {
    /// Create a wiring error
    pub fn wiring(entity: &str, expected: usize, actual: usize) -> Self {
        QlightError::WiringError {
            entity: entity.to_string(),
            expected,
            actual,
        }
    }

    /// Check if error comes from a bad configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            QlightError::InvalidConfiguration(_)
                | QlightError::InvalidProbability(_)
                | QlightError::UnsupportedEncoding { .. }
        )
    }

    /// Check if error comes from component wiring
    pub fn is_wiring_error(&self) -> bool {
        matches!(
            self,
            QlightError::WiringError { .. }
                | QlightError::NotInitialized(_)
                | QlightError::EncodingMismatch { .. }
                | QlightError::UnknownEntity(_)
                | QlightError::ReentrantDelivery(_)
        )
    }

    /// Check if error concerns a quantum state
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            QlightError::AmbiguousTarget(_)
                | QlightError::UnsupportedStateDimension(_)
                | QlightError::NotNormalized(_)
                | QlightError::DimensionMismatch { .. }
                | QlightError::UnknownStateKey(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QlightError::InvalidProbability(1.5);
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_wiring_error() {
        let err = QlightError::wiring("spdc", 2, 1);
        assert!(err.to_string().contains("spdc"));
        assert!(err.to_string().contains('2'));
        assert!(err.is_wiring_error());
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_classification() {
        assert!(QlightError::InvalidConfiguration("mode".into()).is_configuration_error());
        assert!(QlightError::AmbiguousTarget(4).is_state_error());
        assert!(QlightError::UnsupportedStateDimension(9).is_state_error());
        assert!(!QlightError::FileError("x".into()).is_state_error());
    }

    #[test]
    fn test_json_conversion() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: QlightError = parse.unwrap_err().into();
        assert!(matches!(err, QlightError::JsonError(_)));
    }
}
