//! Source node configuration
//!
//! Gantree: L5_Node → SourceNodeConfig
//!
//! JSON configuration of a source node. Every key is optional; numeric
//! fields accept either numbers or numeric strings such as `"8e6"`.

use qlight_core::{defaults, Encoding, QlightResult};
use qlight_source::{BellState, PairSourceConfig, PhotonStatistics};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Lenient Numbers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            RawNumber::Number(x) => Ok(x),
            RawNumber::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, got '{}'", text))),
        }
    }
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    RawNumber::deserialize(deserializer)?.into_f64()
}

fn number_pair<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[f64; 2], D::Error> {
    let [a, b] = <[RawNumber; 2]>::deserialize(deserializer)?;
    Ok([a.into_f64()?, b.into_f64()?])
}

// ============================================================================
// SourceNodeConfig
// ============================================================================

/// Source node configuration
/// Gantree: SourceNodeConfig // 노드 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceNodeConfig {
    /// Wavelengths of the two output modes (nm)
    /// Gantree: wavelengths: [f64;2] // [1550,1550]
    #[serde(deserialize_with = "number_pair")]
    pub wavelengths: [f64; 2],

    /// Emission frequency (Hz)
    /// Gantree: frequency: f64 // 8e7
    #[serde(deserialize_with = "number")]
    pub frequency: f64,

    /// Mean pair number per cycle
    /// Gantree: mean_photon_num: f64 // 0.1
    #[serde(deserialize_with = "number")]
    pub mean_photon_num: f64,

    /// Phase error probability
    #[serde(deserialize_with = "number")]
    pub phase_error: f64,

    /// Spectral bandwidth (nm)
    #[serde(deserialize_with = "number")]
    pub bandwidth: f64,

    /// Encoding name
    /// Gantree: encoding: String // polarization
    pub encoding: String,

    /// Optional Bell state label
    /// Gantree: bell_state: Option<String> // phi+/phi-/psi+/psi-
    pub bell_state: Option<String>,

    /// Pair statistics name; absent means thermal for Bell pairs and
    /// Poisson otherwise
    pub photon_statistics: Option<String>,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for SourceNodeConfig {
    fn default() -> Self {
        Self {
            wavelengths: [defaults::WAVELENGTH_NM; 2],
            frequency: defaults::FREQUENCY_HZ,
            mean_photon_num: defaults::MEAN_PHOTON_NUM,
            phase_error: 0.0,
            bandwidth: 0.0,
            encoding: Encoding::Polarization.name().to_string(),
            bell_state: None,
            photon_statistics: None,
            seed: None,
        }
    }
}

impl SourceNodeConfig {
    // ========================================================================
    // Loading
    // ========================================================================

    /// Parse from a JSON string
    /// Gantree: from_json(str) -> Result<Self> // JSON 로드
    pub fn from_json(json: &str) -> QlightResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> QlightResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set frequency (Hz)
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set mean pair number
    pub fn with_mean_photon_num(mut self, mean: f64) -> Self {
        self.mean_photon_num = mean;
        self
    }

    /// Set encoding name
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Set Bell state label
    pub fn with_bell_state(mut self, label: impl Into<String>) -> Self {
        self.bell_state = Some(label.into());
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Resolve names and build the pair-source configuration
    /// Gantree: to_pair_config(component) -> Result<PairSourceConfig> // 변환
    ///
    /// `component` is used in errors for an unknown encoding name.
    pub fn to_pair_config(&self, component: &str) -> QlightResult<PairSourceConfig> {
        let encoding = Encoding::parse(&self.encoding, component)?;
        let statistics = self
            .photon_statistics
            .as_deref()
            .map(str::parse::<PhotonStatistics>)
            .transpose()?;
        let bell_state = self
            .bell_state
            .as_deref()
            .map(str::parse::<BellState>)
            .transpose()?;

        let config = PairSourceConfig {
            frequency_hz: self.frequency,
            wavelengths_nm: self.wavelengths,
            mean_photon_num: self.mean_photon_num,
            encoding,
            bell_state,
            phase_error: self.phase_error,
            bandwidth_nm: self.bandwidth,
            statistics,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
