//! Dense complex operators for QLIGHT
//!
//! Gantree: L1_State → Operator
//!
//! Small row-major matrices acting on joint state vectors. Sizes stay tiny
//! (2×2 Jones matrices and their 4×4 embeddings), so no BLAS is involved.

use crate::error::{QlightError, QlightResult};
use crate::types::Amplitude;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Square complex matrix
/// Gantree: Operator // 연산자
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    dim: usize,
    data: Vec<Complex64>,
}

impl Operator {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Build a 2×2 operator
    pub fn from_2x2(m: [[Complex64; 2]; 2]) -> Self {
        Self {
            dim: 2,
            data: vec![m[0][0], m[0][1], m[1][0], m[1][1]],
        }
    }

    /// Identity of dimension `dim`
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = Complex64::new(1.0, 0.0);
        }
        Self { dim, data }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Matrix dimension
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// Kronecker product `self ⊗ other`
    /// Gantree: kron(a,b) -> Operator // 텐서곱
    pub fn kron(&self, other: &Operator) -> Operator {
        let dim = self.dim * other.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];

        for ar in 0..self.dim {
            for ac in 0..self.dim {
                let a = self.get(ar, ac);
                for br in 0..other.dim {
                    for bc in 0..other.dim {
                        let row = ar * other.dim + br;
                        let col = ac * other.dim + bc;
                        data[row * dim + col] = a * other.get(br, bc);
                    }
                }
            }
        }

        Operator { dim, data }
    }

    /// Matrix product `self · other`
    pub fn matmul(&self, other: &Operator) -> QlightResult<Operator> {
        if self.dim != other.dim {
            return Err(QlightError::DimensionMismatch {
                operator: self.dim,
                state: other.dim,
            });
        }

        let n = self.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); n * n];
        for i in 0..n {
            for k in 0..n {
                let a = self.get(i, k);
                for j in 0..n {
                    data[i * n + j] += a * other.get(k, j);
                }
            }
        }
        Ok(Operator { dim: n, data })
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> Operator {
        let n = self.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); n * n];
        for i in 0..n {
            for j in 0..n {
                data[j * n + i] = self.get(i, j).conj();
            }
        }
        Operator { dim: n, data }
    }

    /// Check U†U = I within tolerance
    pub fn is_unitary(&self, tol: f64) -> bool {
        let product = match self.adjoint().matmul(self) {
            Ok(p) => p,
            Err(_) => return false,
        };
        let identity = Operator::identity(self.dim);
        product
            .data
            .iter()
            .zip(identity.data.iter())
            .all(|(a, b)| (a - b).norm() < tol)
    }

    /// Multiply a state vector
    /// Gantree: apply(state) -> Vec<Amplitude> // 상태 변환
    pub fn apply(&self, state: &[Amplitude]) -> QlightResult<Vec<Amplitude>> {
        if state.len() != self.dim {
            return Err(QlightError::DimensionMismatch {
                operator: self.dim,
                state: state.len(),
            });
        }

        Ok((0..self.dim)
            .map(|row| {
                state
                    .iter()
                    .enumerate()
                    .map(|(col, amp)| self.get(row, col) * *amp)
                    .sum()
            })
            .collect())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.dim {
            let cells: Vec<String> = (0..self.dim)
                .map(|col| {
                    let c = self.get(row, col);
                    format!("{:+.4}{:+.4}i", c.re, c.im)
                })
                .collect();
            writeln!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

/// Total probability of a state vector
pub fn total_probability(state: &[Amplitude]) -> f64 {
    state.iter().map(|a| a.norm_sqr()).sum()
}

// ============================================================================
// Tests
// ============================================================================
