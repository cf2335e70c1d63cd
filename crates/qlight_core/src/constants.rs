//! Constants for QLIGHT
//!
//! Gantree: L0_Foundation → Constants
//!
//! Time units, source defaults, and reference quantum states.

// ============================================================================
// Time Constants
// Gantree: time // 시간 단위
// ============================================================================

pub mod time {
    //! Simulation time units (the timeline counts picoseconds)

    use crate::types::SimTime;

    /// Picoseconds per second
    pub const PS_PER_SECOND: f64 = 1e12;

    /// Cycle period in picoseconds for an emission frequency in Hz
    #[inline]
    pub fn period_ps(frequency_hz: f64) -> f64 {
        PS_PER_SECOND / frequency_hz
    }

    /// Period rounded to the timeline unit
    #[inline]
    pub fn period_ticks(frequency_hz: f64) -> SimTime {
        period_ps(frequency_hz).round() as SimTime
    }

    /// Base time of cycle `n`, rounded once at dispatch
    ///
    /// The fractional part of the period is never carried between cycles,
    /// so cycle `n` always lands on `start + round(n * period)`.
    #[inline]
    pub fn cycle_time(start: SimTime, cycle: u64, frequency_hz: f64) -> SimTime {
        start + (cycle as f64 * period_ps(frequency_hz)).round() as SimTime
    }
}

// ============================================================================
// Source Defaults
// Gantree: defaults // 기본값
// ============================================================================

pub mod defaults {
    //! Default source parameters

    /// Emission frequency (Hz)
    pub const FREQUENCY_HZ: f64 = 8e7;

    /// Photon wavelength (nm)
    pub const WAVELENGTH_NM: f64 = 1550.0;

    /// Mean photon (pair) number per cycle
    pub const MEAN_PHOTON_NUM: f64 = 0.1;

    /// Fock-space truncation of the quantum manager
    pub const TRUNCATION: usize = 1;

    /// Tolerance used by normalization checks
    pub const NORM_TOLERANCE: f64 = 1e-6;
}

// ============================================================================
// Reference States
// Gantree: states // 기준 상태
// ============================================================================

pub mod states {
    //! Polarization bases and Bell states

    use num_complex::Complex64;
    use std::f64::consts::FRAC_1_SQRT_2;

    const ZERO: Complex64 = Complex64::new(0.0, 0.0);
    const ONE: Complex64 = Complex64::new(1.0, 0.0);
    const H: Complex64 = Complex64::new(FRAC_1_SQRT_2, 0.0);
    const NEG_H: Complex64 = Complex64::new(-FRAC_1_SQRT_2, 0.0);

    /// Rectilinear basis {|H⟩, |V⟩}
    pub const RECTILINEAR: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, ONE]];

    /// Diagonal basis {|+⟩, |−⟩}
    pub const DIAGONAL: [[Complex64; 2]; 2] = [[H, H], [NEG_H, H]];

    /// Both polarization bases, indexed by basis then bit
    pub const POLARIZATION_BASES: [[[Complex64; 2]; 2]; 2] = [RECTILINEAR, DIAGONAL];

    /// |Φ+⟩ = (|HH⟩ + |VV⟩)/√2
    pub const PHI_PLUS: [Complex64; 4] = [H, ZERO, ZERO, H];

    /// |Φ−⟩ = (|HH⟩ − |VV⟩)/√2
    pub const PHI_MINUS: [Complex64; 4] = [H, ZERO, ZERO, NEG_H];

    /// |Ψ+⟩ = (|HV⟩ + |VH⟩)/√2
    pub const PSI_PLUS: [Complex64; 4] = [ZERO, H, H, ZERO];

    /// |Ψ−⟩ = (|HV⟩ − |VH⟩)/√2
    pub const PSI_MINUS: [Complex64; 4] = [ZERO, H, NEG_H, ZERO];

    /// Absorptive pair emitted (|1,1⟩ in click basis)
    pub const ABSORPTIVE_PAIR: [Complex64; 4] = [ZERO, ZERO, ZERO, ONE];

    /// Absorptive placeholder (|0,0⟩, no pair this cycle)
    pub const ABSORPTIVE_NULL: [Complex64; 4] = [ONE, ZERO, ZERO, ZERO];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period() {
        assert_eq!(time::period_ticks(1e8), 10_000);
        assert_eq!(time::period_ticks(8e7), 12_500);
    }

    #[test]
    fn test_cycle_time_no_drift() {
        // 3e9 Hz gives a 333.33.. ps period
        let f = 3e9;
        assert_eq!(time::cycle_time(0, 3, f), 1000);
        assert_eq!(time::cycle_time(0, 1000, f), 333_333);
        assert_eq!(time::cycle_time(50, 1, f), 383);
    }

    #[test]
    fn test_bell_states_normalized() {
        for state in [
            states::PHI_PLUS,
            states::PHI_MINUS,
            states::PSI_PLUS,
            states::PSI_MINUS,
        ] {
            let norm: f64 = state.iter().map(|a| a.norm_sqr()).sum();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }
}
