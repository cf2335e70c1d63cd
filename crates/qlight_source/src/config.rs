//! Source configuration
//!
//! Gantree: L3_Source → SourceConfig
//!
//! Configuration for single-photon and entangled-pair sources.

use crate::pair_encoding::{BellState, PairEncoding};
use qlight_core::{defaults, Encoding, QlightError, QlightResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Photon Statistics
// ============================================================================

/// Photon-number distribution per emission cycle
/// Gantree: PhotonStatistics // 광자 통계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PhotonStatistics {
    /// Geometric (failures before first success), mean = mean_photon_num
    /// Gantree: Thermal // 열 분포
    #[default]
    Thermal,

    /// Poisson with rate mean_photon_num
    /// Gantree: Poisson // 푸아송
    Poisson,
}

impl PhotonStatistics {
    /// Mode name
    pub fn name(&self) -> &'static str {
        match self {
            PhotonStatistics::Thermal => "thermal",
            PhotonStatistics::Poisson => "poisson",
        }
    }
}

impl fmt::Display for PhotonStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PhotonStatistics {
    type Err = QlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "thermal" => Ok(PhotonStatistics::Thermal),
            "poisson" => Ok(PhotonStatistics::Poisson),
            _ => Err(QlightError::InvalidConfiguration(format!(
                "unknown photon statistics mode '{}'",
                s
            ))),
        }
    }
}

// ============================================================================
// Shared Validation
// ============================================================================

fn validate_frequency(frequency_hz: f64) -> QlightResult<()> {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return Err(QlightError::InvalidConfiguration(format!(
            "frequency must be positive, got {}",
            frequency_hz
        )));
    }
    Ok(())
}

pub(crate) fn validate_mean(mean_photon_num: f64) -> QlightResult<()> {
    if !mean_photon_num.is_finite() || mean_photon_num < 0.0 {
        return Err(QlightError::InvalidConfiguration(format!(
            "mean photon number must be finite and >= 0, got {}",
            mean_photon_num
        )));
    }
    Ok(())
}

fn validate_probability(phase_error: f64) -> QlightResult<()> {
    if !(0.0..=1.0).contains(&phase_error) {
        return Err(QlightError::InvalidProbability(phase_error));
    }
    Ok(())
}

fn validate_width(width_nm: f64) -> QlightResult<()> {
    if !width_nm.is_finite() || width_nm < 0.0 {
        return Err(QlightError::InvalidConfiguration(format!(
            "spectral width must be >= 0, got {}",
            width_nm
        )));
    }
    Ok(())
}

// ============================================================================
// LightSourceConfig
// ============================================================================

/// Single-photon source configuration
/// Gantree: LightSourceConfig // 단일 광원 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSourceConfig {
    /// Emission frequency (Hz)
    /// Gantree: frequency_hz: f64 // 주파수 (8e7)
    pub frequency_hz: f64,

    /// Nominal wavelength (nm)
    /// Gantree: wavelength_nm: f64 // 파장 (1550)
    pub wavelength_nm: f64,

    /// Standard deviation of the wavelength (nm)
    pub linewidth_nm: f64,

    /// Mean photon number per cycle
    /// Gantree: mean_photon_num: f64 // 평균 광자수 (0.1)
    pub mean_photon_num: f64,

    /// Encoding of emitted photons
    pub encoding: Encoding,

    /// Probability of flipping the sign of |V⟩ per cycle
    /// Gantree: phase_error: f64 // 위상 오류
    pub phase_error: f64,

    /// Photon-number distribution
    pub statistics: PhotonStatistics,

    /// Random seed (derived from the timeline when absent)
    pub seed: Option<u64>,
}

impl Default for LightSourceConfig {
    fn default() -> Self {
        Self {
            frequency_hz: defaults::FREQUENCY_HZ,
            wavelength_nm: defaults::WAVELENGTH_NM,
            linewidth_nm: 0.0,
            mean_photon_num: defaults::MEAN_PHOTON_NUM,
            encoding: Encoding::Polarization,
            phase_error: 0.0,
            statistics: PhotonStatistics::Thermal,
            seed: None,
        }
    }
}

impl LightSourceConfig {
    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set frequency (Hz)
    pub fn with_frequency(mut self, frequency_hz: f64) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    /// Set wavelength (nm)
    pub fn with_wavelength(mut self, wavelength_nm: f64) -> Self {
        self.wavelength_nm = wavelength_nm;
        self
    }

    /// Set linewidth (nm)
    pub fn with_linewidth(mut self, linewidth_nm: f64) -> Self {
        self.linewidth_nm = linewidth_nm;
        self
    }

    /// Set mean photon number
    pub fn with_mean_photon_num(mut self, mean: f64) -> Self {
        self.mean_photon_num = mean;
        self
    }

    /// Set encoding
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set phase error probability
    pub fn with_phase_error(mut self, phase_error: f64) -> Self {
        self.phase_error = phase_error;
        self
    }

    /// Set photon statistics
    pub fn with_statistics(mut self, statistics: PhotonStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    /// Gantree: validate(&self) -> Result // 검증
    pub fn validate(&self) -> QlightResult<()> {
        validate_frequency(self.frequency_hz)?;
        validate_mean(self.mean_photon_num)?;
        validate_probability(self.phase_error)?;
        validate_width(self.linewidth_nm)
    }
}

// ============================================================================
// PairSourceConfig
// ============================================================================

/// Entangled-pair (SPDC) source configuration
/// Gantree: PairSourceConfig // 쌍 광원 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairSourceConfig {
    /// Emission frequency (Hz)
    pub frequency_hz: f64,

    /// Wavelengths of the two output modes (nm)
    /// Gantree: wavelengths_nm: [f64;2] // 파장 쌍
    pub wavelengths_nm: [f64; 2],

    /// Mean pair number per cycle
    pub mean_photon_num: f64,

    /// Encoding of emitted photons
    /// Gantree: encoding: Encoding // 인코딩
    pub encoding: Encoding,

    /// Fixed Bell state for polarization pairs
    /// Gantree: bell_state: Option<BellState> // 벨 상태
    pub bell_state: Option<BellState>,

    /// Probability of flipping the sign of |V⟩ per cycle
    pub phase_error: f64,

    /// Spectral bandwidth (nm)
    pub bandwidth_nm: f64,

    /// Pair-number distribution; `None` picks the encoding's own
    /// Gantree: statistics: Option<PhotonStatistics> // 쌍 수 분포
    pub statistics: Option<PhotonStatistics>,

    /// Random seed (derived from the timeline when absent)
    pub seed: Option<u64>,
}

impl Default for PairSourceConfig {
    fn default() -> Self {
        Self {
            frequency_hz: defaults::FREQUENCY_HZ,
            wavelengths_nm: [defaults::WAVELENGTH_NM; 2],
            mean_photon_num: defaults::MEAN_PHOTON_NUM,
            encoding: Encoding::Polarization,
            bell_state: None,
            phase_error: 0.0,
            bandwidth_nm: 0.0,
            statistics: None,
            seed: None,
        }
    }
}

impl PairSourceConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Bell-pair source emitting `bell`
    pub fn bell(bell: BellState) -> Self {
        Self::default().with_bell_state(bell)
    }

    /// Fock (two-mode squeezed vacuum) source
    pub fn fock() -> Self {
        Self::default().with_encoding(Encoding::Fock)
    }

    /// Absorptive source
    pub fn absorptive() -> Self {
        Self::default().with_encoding(Encoding::Absorptive)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set frequency (Hz)
    pub fn with_frequency(mut self, frequency_hz: f64) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    /// Set both wavelengths (nm)
    pub fn with_wavelengths(mut self, signal_nm: f64, idler_nm: f64) -> Self {
        self.wavelengths_nm = [signal_nm, idler_nm];
        self
    }

    /// Set mean pair number
    pub fn with_mean_photon_num(mut self, mean: f64) -> Self {
        self.mean_photon_num = mean;
        self
    }

    /// Set encoding
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set Bell state (polarization encoding)
    pub fn with_bell_state(mut self, bell: BellState) -> Self {
        self.encoding = Encoding::Polarization;
        self.bell_state = Some(bell);
        self
    }

    /// Set phase error probability
    pub fn with_phase_error(mut self, phase_error: f64) -> Self {
        self.phase_error = phase_error;
        self
    }

    /// Set bandwidth (nm)
    pub fn with_bandwidth(mut self, bandwidth_nm: f64) -> Self {
        self.bandwidth_nm = bandwidth_nm;
        self
    }

    /// Set pair statistics
    pub fn with_statistics(mut self, statistics: PhotonStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // ========================================================================
    // Derived Values
    // ========================================================================

    /// Pair encoding selected by `encoding` and `bell_state`
    /// Gantree: pair_encoding() -> Result<PairEncoding> // 인코딩 선택
    pub fn pair_encoding(&self) -> QlightResult<PairEncoding> {
        match (self.encoding, self.bell_state) {
            (Encoding::Polarization, Some(bell)) => Ok(PairEncoding::Bell(bell)),
            (Encoding::Polarization, None) => Ok(PairEncoding::Polarization),
            (Encoding::Fock, None) => Ok(PairEncoding::Fock),
            (Encoding::Absorptive, None) => Ok(PairEncoding::Absorptive),
            (encoding, Some(bell)) => Err(QlightError::InvalidConfiguration(format!(
                "Bell state '{}' requires polarization encoding, got '{}'",
                bell, encoding
            ))),
        }
    }

    /// Pair-number distribution in effect
    /// Gantree: effective_statistics() -> PhotonStatistics // 분포 결정
    ///
    /// Bell sources default to thermal, the other pair sources to Poisson.
    /// Fock sources never sample.
    pub fn effective_statistics(&self) -> PhotonStatistics {
        match (self.statistics, self.bell_state) {
            (Some(statistics), _) => statistics,
            (None, Some(_)) => PhotonStatistics::Thermal,
            (None, None) => PhotonStatistics::Poisson,
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> QlightResult<()> {
        validate_frequency(self.frequency_hz)?;
        validate_mean(self.mean_photon_num)?;
        validate_probability(self.phase_error)?;
        validate_width(self.bandwidth_nm)?;
        if self.wavelengths_nm.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(QlightError::InvalidConfiguration(format!(
                "wavelengths must be positive, got {:?}",
                self.wavelengths_nm
            )));
        }
        self.pair_encoding().map(|_| ())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_parse() {
        assert_eq!(
            "thermal".parse::<PhotonStatistics>().unwrap(),
            PhotonStatistics::Thermal
        );
        assert_eq!(
            "Poisson".parse::<PhotonStatistics>().unwrap(),
            PhotonStatistics::Poisson
        );
        let err = "binomial".parse::<PhotonStatistics>().unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_light_source_defaults_valid() {
        let config = LightSourceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frequency_hz, 8e7);
        assert_eq!(config.statistics, PhotonStatistics::Thermal);
    }

    #[test]
    fn test_light_source_validation() {
        assert!(LightSourceConfig::default()
            .with_frequency(0.0)
            .validate()
            .is_err());
        assert!(LightSourceConfig::default()
            .with_mean_photon_num(-0.5)
            .validate()
            .is_err());
        assert!(LightSourceConfig::default()
            .with_mean_photon_num(f64::NAN)
            .validate()
            .is_err());
        assert_eq!(
            LightSourceConfig::default()
                .with_phase_error(1.5)
                .validate()
                .unwrap_err(),
            QlightError::InvalidProbability(1.5)
        );
    }

    #[test]
    fn test_pair_encoding_selection() {
        assert_eq!(
            PairSourceConfig::default().pair_encoding().unwrap(),
            PairEncoding::Polarization
        );
        assert_eq!(
            PairSourceConfig::bell(BellState::PhiMinus)
                .pair_encoding()
                .unwrap(),
            PairEncoding::Bell(BellState::PhiMinus)
        );
        assert_eq!(
            PairSourceConfig::fock().pair_encoding().unwrap(),
            PairEncoding::Fock
        );

        let mut bad = PairSourceConfig::absorptive();
        bad.bell_state = Some(BellState::PsiPlus);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_statistics_follow_encoding() {
        use PhotonStatistics::{Poisson, Thermal};

        assert_eq!(PairSourceConfig::default().effective_statistics(), Poisson);
        assert_eq!(PairSourceConfig::absorptive().effective_statistics(), Poisson);
        assert_eq!(
            PairSourceConfig::bell(BellState::PsiPlus).effective_statistics(),
            Thermal
        );
        assert_eq!(
            PairSourceConfig::default()
                .with_statistics(Thermal)
                .effective_statistics(),
            Thermal
        );
        assert_eq!(
            PairSourceConfig::bell(BellState::PhiMinus)
                .with_statistics(Poisson)
                .effective_statistics(),
            Poisson
        );
    }

    #[test]
    fn test_pair_config_json() {
        let json = r#"{"encoding": "absorptive", "mean_photon_num": 0.5, "statistics": "poisson"}"#;
        let config: PairSourceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.encoding, Encoding::Absorptive);
        assert_eq!(config.wavelengths_nm, [1550.0, 1550.0]);
        assert_eq!(config.statistics, Some(PhotonStatistics::Poisson));
        assert!(config.validate().is_ok());

        let bell: PairSourceConfig = serde_json::from_str(r#"{"bell_state": "phi+"}"#).unwrap();
        assert_eq!(bell.bell_state, Some(BellState::PhiPlus));
    }
}
