//! Pair encodings
//!
//! Gantree: L3_Source → PairEncoding
//!
//! Each variant knows how many pairs a cycle emits and which joint state the
//! two photons of a pair share.

use crate::sampler::PairGenerationSampler;
use num_complex::Complex64;
use qlight_core::{states, Amplitude, Encoding, QlightError, QlightResult, QubitState};
use qlight_kernel::EntityRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Bell States
// ============================================================================

/// Polarization Bell state
/// Gantree: BellState // phi+/phi-/psi+/psi-
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BellState {
    /// (|HH⟩ + |VV⟩)/√2
    #[serde(rename = "phi+")]
    PhiPlus,
    /// (|HH⟩ − |VV⟩)/√2
    #[serde(rename = "phi-")]
    PhiMinus,
    /// (|HV⟩ + |VH⟩)/√2
    #[default]
    #[serde(rename = "psi+")]
    PsiPlus,
    /// (|HV⟩ − |VH⟩)/√2
    #[serde(rename = "psi-")]
    PsiMinus,
}

impl BellState {
    /// All four Bell states
    pub const ALL: [BellState; 4] = [
        BellState::PhiPlus,
        BellState::PhiMinus,
        BellState::PsiPlus,
        BellState::PsiMinus,
    ];

    /// Short label
    pub fn label(&self) -> &'static str {
        match self {
            BellState::PhiPlus => "phi+",
            BellState::PhiMinus => "phi-",
            BellState::PsiPlus => "psi+",
            BellState::PsiMinus => "psi-",
        }
    }

    /// State vector in the |HH⟩, |HV⟩, |VH⟩, |VV⟩ basis
    pub fn amplitudes(&self) -> [Complex64; 4] {
        match self {
            BellState::PhiPlus => states::PHI_PLUS,
            BellState::PhiMinus => states::PHI_MINUS,
            BellState::PsiPlus => states::PSI_PLUS,
            BellState::PsiMinus => states::PSI_MINUS,
        }
    }
}

impl fmt::Display for BellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BellState {
    type Err = QlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BellState::ALL
            .iter()
            .copied()
            .find(|b| b.label() == s.to_ascii_lowercase())
            .ok_or_else(|| {
                QlightError::InvalidConfiguration(format!(
                    "unknown Bell state '{}': expected phi+, phi-, psi+ or psi-",
                    s
                ))
            })
    }
}

// ============================================================================
// Two-Mode Squeezed Vacuum
// ============================================================================

/// Truncated two-mode squeezed vacuum over (truncation+1)² amplitudes
/// Gantree: tmsv_state(mean,truncation) -> Vec<Amplitude> // 압축 진공
///
/// |m,m⟩ for m < truncation carries r^m/√(mean+1) with r = √(mean/(mean+1));
/// |truncation,truncation⟩ carries whatever probability is left.
pub fn tmsv_state(mean_photon_num: f64, truncation: usize) -> Vec<Amplitude> {
    let local = truncation + 1;
    let r = (mean_photon_num / (mean_photon_num + 1.0)).sqrt();
    let vacuum = 1.0 / (mean_photon_num + 1.0).sqrt();

    let mut amplitudes = vec![Complex64::new(0.0, 0.0); local * local];
    let mut kept = 0.0;
    for m in 0..truncation {
        let amp = r.powi(m as i32) * vacuum;
        kept += amp * amp;
        amplitudes[m * local + m] = Complex64::new(amp, 0.0);
    }
    let residual = (1.0 - kept).max(0.0).sqrt();
    amplitudes[truncation * local + truncation] = Complex64::new(residual, 0.0);

    amplitudes
}

// ============================================================================
// PairEncoding
// ============================================================================

/// Joint-state strategy of a pair source
/// Gantree: PairEncoding // enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairEncoding {
    /// (a_H, 0, 0, a_V) from a caller-supplied qubit per cycle
    Polarization,
    /// Truncated two-mode squeezed vacuum, one pair per cycle
    Fock,
    /// Click basis with a null placeholder pair on empty cycles
    Absorptive,
    /// Fixed Bell state
    Bell(BellState),
}

impl PairEncoding {
    /// Photon encoding tag
    pub fn encoding(&self) -> Encoding {
        match self {
            PairEncoding::Polarization | PairEncoding::Bell(_) => Encoding::Polarization,
            PairEncoding::Fock => Encoding::Fock,
            PairEncoding::Absorptive => Encoding::Absorptive,
        }
    }

    /// Whether each cycle needs a caller-supplied qubit state
    pub fn needs_states(&self) -> bool {
        matches!(self, PairEncoding::Polarization)
    }

    /// Whether the phase-error knob applies
    pub fn uses_phase_error(&self) -> bool {
        matches!(self, PairEncoding::Polarization)
    }

    /// Pair count of one cycle
    /// Gantree: sample_count(sampler,rng) -> u64 // 쌍 수
    ///
    /// Fock emits exactly one squeezed-vacuum pair and consumes no draw; the
    /// number statistics live in the state itself.
    pub fn sample_count(&self, sampler: &PairGenerationSampler, rng: &mut EntityRng) -> u64 {
        match self {
            PairEncoding::Fock => 1,
            _ => sampler.sample(rng),
        }
    }

    /// Pairs to dispatch for `count`, and whether they are null placeholders
    pub fn dispatch_plan(&self, count: u64) -> (u64, bool) {
        match self {
            PairEncoding::Absorptive if count == 0 => (1, true),
            _ => (count, false),
        }
    }

    /// Joint state shared by both photons of a pair
    /// Gantree: build_joint_state(count,input,truncation) -> Result<Vec> // 결합 상태
    pub fn build_joint_state(
        &self,
        count: u64,
        input: Option<&QubitState>,
        mean_photon_num: f64,
        truncation: usize,
    ) -> QlightResult<Vec<Amplitude>> {
        let zero = Complex64::new(0.0, 0.0);
        match self {
            PairEncoding::Polarization => {
                let state = input.ok_or_else(|| {
                    QlightError::InvalidConfiguration(
                        "polarization pairs need one qubit state per cycle".into(),
                    )
                })?;
                Ok(vec![state[0], zero, zero, state[1]])
            }
            PairEncoding::Fock => Ok(tmsv_state(mean_photon_num, truncation)),
            PairEncoding::Absorptive if count == 0 => Ok(states::ABSORPTIVE_NULL.to_vec()),
            PairEncoding::Absorptive => Ok(states::ABSORPTIVE_PAIR.to_vec()),
            PairEncoding::Bell(bell) => Ok(bell.amplitudes().to_vec()),
        }
    }
}

impl fmt::Display for PairEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairEncoding::Bell(bell) => write!(f, "bell({})", bell),
            other => write!(f, "{}", other.encoding()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
