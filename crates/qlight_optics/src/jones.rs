//! Jones matrices
//!
//! Gantree: L4_Optics → Jones
//!
//! 2×2 polarization operators and their embedding into the 4-dimensional
//! space of a photon pair.

use num_complex::Complex64;
use qlight_core::{Operator, QlightError, QlightResult, Subsystem};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wave plate retardance
/// Gantree: PlateType // HWP/QWP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlateType {
    /// λ/2 retarder
    #[default]
    #[serde(rename = "HWP")]
    HalfWave,
    /// λ/4 retarder
    #[serde(rename = "QWP")]
    QuarterWave,
}

impl PlateType {
    /// Short name
    pub fn name(&self) -> &'static str {
        match self {
            PlateType::HalfWave => "HWP",
            PlateType::QuarterWave => "QWP",
        }
    }

    /// Jones matrix with the fast axis at `theta` radians
    pub fn jones(&self, theta: f64) -> Operator {
        match self {
            PlateType::HalfWave => half_wave(theta),
            PlateType::QuarterWave => quarter_wave(theta),
        }
    }
}

impl fmt::Display for PlateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PlateType {
    type Err = QlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HWP" => Ok(PlateType::HalfWave),
            "QWP" => Ok(PlateType::QuarterWave),
            _ => Err(QlightError::InvalidConfiguration(format!(
                "invalid wave plate type '{}': expected HWP or QWP",
                s
            ))),
        }
    }
}

/// Half-wave plate: [[cos2θ, sin2θ], [sin2θ, −cos2θ]]
/// Gantree: half_wave(theta) -> Operator // 반파장판
pub fn half_wave(theta: f64) -> Operator {
    let c = Complex64::new((2.0 * theta).cos(), 0.0);
    let s = Complex64::new((2.0 * theta).sin(), 0.0);
    Operator::from_2x2([[c, s], [s, -c]])
}

/// Quarter-wave plate, global phase dropped
/// Gantree: quarter_wave(theta) -> Operator // 사분파장판
pub fn quarter_wave(theta: f64) -> Operator {
    let (sin, cos) = theta.sin_cos();
    let i = Complex64::i();
    let one = Complex64::new(1.0, 0.0);

    let diag_h = cos * cos + i * sin * sin;
    let diag_v = sin * sin + i * cos * cos;
    let off = (one - i) * sin * cos;
    Operator::from_2x2([[diag_h, off], [off, diag_v]])
}

/// Embed a 2×2 operator into a state of dimension `dim`
/// Gantree: embed(jones,dim,which) -> Result<Operator> // 텐서 확장
///
/// Dimension 2 takes the operator as is. Dimension 4 needs a target:
/// signal → U⊗I, idler → I⊗U, both → U⊗U.
pub fn embed(jones: &Operator, dim: usize, which: Option<Subsystem>) -> QlightResult<Operator> {
    match (dim, which) {
        (2, _) => Ok(jones.clone()),
        (4, Some(Subsystem::Signal)) => Ok(jones.kron(&Operator::identity(2))),
        (4, Some(Subsystem::Idler)) => Ok(Operator::identity(2).kron(jones)),
        (4, Some(Subsystem::Both)) => Ok(jones.kron(jones)),
        (4, None) => Err(QlightError::AmbiguousTarget(dim)),
        _ => Err(QlightError::UnsupportedStateDimension(dim)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qlight_core::{qubit, states};
    use std::f64::consts::{FRAC_PI_4, FRAC_PI_8};

    fn assert_state_eq(a: &[Complex64], b: &[Complex64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert_relative_eq!(x.re, y.re, epsilon = 1e-12);
            assert_relative_eq!(x.im, y.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_plates_unitary() {
        for k in 0..16 {
            let theta = k as f64 * 0.3;
            assert!(half_wave(theta).is_unitary(1e-12));
            assert!(quarter_wave(theta).is_unitary(1e-12));
        }
    }

    #[test]
    fn test_half_wave_involution() {
        let state = vec![Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)];
        for theta in [0.0, 0.1, FRAC_PI_8, 1.0] {
            let hwp = half_wave(theta);
            let twice = hwp.apply(&hwp.apply(&state).unwrap()).unwrap();
            assert_state_eq(&twice, &state);
        }
    }

    #[test]
    fn test_half_wave_rotates_h_to_v() {
        let out = half_wave(FRAC_PI_4).apply(&qubit(1.0, 0.0)).unwrap();
        assert_state_eq(&out, &qubit(0.0, 1.0));

        // θ = π/8 maps |H⟩ to |+⟩
        let out = half_wave(FRAC_PI_8).apply(&qubit(1.0, 0.0)).unwrap();
        assert_state_eq(&out, &states::DIAGONAL[0]);
    }

    #[test]
    fn test_quarter_wave_makes_circular() {
        // Fast axis at 0: |+⟩ picks up a relative phase of i
        let out = quarter_wave(0.0).apply(&states::DIAGONAL[0]).unwrap();
        assert_relative_eq!(out[0].re, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(out[1].im, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);

        // Two quarter-wave plates make a half-wave plate (up to phase)
        let qwp = quarter_wave(FRAC_PI_4);
        let twice = qwp.matmul(&qwp).unwrap();
        let hwp = half_wave(FRAC_PI_4);
        let phase = twice.get(0, 1) / hwp.get(0, 1);
        for r in 0..2 {
            for c in 0..2 {
                let diff = twice.get(r, c) - phase * hwp.get(r, c);
                assert!(diff.norm() < 1e-12);
            }
        }
    }

    #[test]
    fn test_embedding_matches_kron() {
        let u = half_wave(0.37);
        let id = Operator::identity(2);

        assert_eq!(embed(&u, 4, Some(Subsystem::Signal)).unwrap(), u.kron(&id));
        assert_eq!(embed(&u, 4, Some(Subsystem::Idler)).unwrap(), id.kron(&u));
        assert_eq!(embed(&u, 4, Some(Subsystem::Both)).unwrap(), u.kron(&u));
        assert_eq!(embed(&u, 2, None).unwrap(), u);

        // Direct construction of U⊗I on |HV⟩
        let out = embed(&u, 4, Some(Subsystem::Signal))
            .unwrap()
            .apply(&[
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
            ])
            .unwrap();
        assert_relative_eq!(out[1].re, u.get(0, 0).re, epsilon = 1e-12);
        assert_relative_eq!(out[3].re, u.get(1, 0).re, epsilon = 1e-12);
    }

    #[test]
    fn test_embedding_errors() {
        let u = half_wave(0.0);
        assert_eq!(embed(&u, 4, None).unwrap_err(), QlightError::AmbiguousTarget(4));
        assert_eq!(
            embed(&u, 9, Some(Subsystem::Signal)).unwrap_err(),
            QlightError::UnsupportedStateDimension(9)
        );
    }

    #[test]
    fn test_plate_type_parse() {
        assert_eq!("hwp".parse::<PlateType>().unwrap(), PlateType::HalfWave);
        assert_eq!("QWP".parse::<PlateType>().unwrap(), PlateType::QuarterWave);
        assert!("full".parse::<PlateType>().is_err());
    }
}
