//! Core types for QLIGHT
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Provides fundamental type aliases and validated wrapper types
//! used throughout the QLIGHT system.

use crate::error::{QlightError, QlightResult};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// Simulation time in picoseconds
/// Gantree: SimTime // pub type SimTime = u64
pub type SimTime = u64;

/// Complex probability amplitude
pub type Amplitude = Complex64;

/// Single-qubit coefficient pair (|H⟩, |V⟩)
/// Gantree: QubitState // [Complex64; 2]
pub type QubitState = [Amplitude; 2];

/// Build a real-valued single-qubit state
pub fn qubit(h: f64, v: f64) -> QubitState {
    [Complex64::new(h, 0.0), Complex64::new(v, 0.0)]
}

// ============================================================================
// Identifiers
// ============================================================================

/// Unique photon identifier, assigned by the quantum manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhotonId(pub u64);

impl fmt::Display for PhotonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "photon#{}", self.0)
    }
}

/// Key into the joint-state arena
/// Gantree: StateKey // 상태 키
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(pub u64);

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key#{}", self.0)
    }
}

// ============================================================================
// Probability (Validated Wrapper)
// ============================================================================

/// Probability value in range [0, 1]
/// Gantree: Probability // 범위 검증 구조체
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Create a new Probability with validation
    pub fn new(value: f64) -> QlightResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(QlightError::InvalidProbability(value));
        }
        Ok(Self(value))
    }

    /// Get the probability value
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the complement (1 - p)
    #[inline]
    pub fn complement(&self) -> f64 {
        1.0 - self.0
    }

    /// Check if the event always happens
    #[inline]
    pub fn is_certain(&self) -> bool {
        self.0 == 1.0
    }

    /// Zero probability
    pub const ZERO: Self = Self(0.0);

    /// Certainty (p = 1)
    pub const ONE: Self = Self(1.0);
}

impl Default for Probability {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = QlightError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Photon encoding scheme
/// Gantree: Encoding // polarization/fock/absorptive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Polarization qubit (|H⟩, |V⟩)
    #[default]
    Polarization,
    /// Photon-number (Fock) basis, truncated
    Fock,
    /// Click/no-click basis used by absorptive memories
    Absorptive,
}

impl Encoding {
    /// Encoding name
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Polarization => "polarization",
            Encoding::Fock => "fock",
            Encoding::Absorptive => "absorptive",
        }
    }

    /// Parse an encoding name
    ///
    /// `component` names the caller so the error points at the right place.
    pub fn parse(name: &str, component: &str) -> QlightResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "polarization" => Ok(Encoding::Polarization),
            "fock" => Ok(Encoding::Fock),
            "absorptive" => Ok(Encoding::Absorptive),
            other => Err(QlightError::UnsupportedEncoding {
                component: component.to_string(),
                encoding: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Encoding {
    type Err = QlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, "encoding")
    }
}

// ============================================================================
// Subsystem
// ============================================================================

/// Which photon of a two-photon state an element acts on
/// Gantree: Subsystem // signal/idler/both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    /// First tensor factor
    Signal,
    /// Second tensor factor
    Idler,
    /// Both factors at once
    Both,
}

impl Subsystem {
    /// Subsystem name
    pub fn name(&self) -> &'static str {
        match self {
            Subsystem::Signal => "signal",
            Subsystem::Idler => "idler",
            Subsystem::Both => "both",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Subsystem {
    type Err = QlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "signal" => Ok(Subsystem::Signal),
            "idler" => Ok(Subsystem::Idler),
            "both" => Ok(Subsystem::Both),
            _ => Err(QlightError::InvalidConfiguration(format!(
                "unknown subsystem '{}': expected signal, idler or both",
                s
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
