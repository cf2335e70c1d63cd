//! Photon token for QLIGHT
//!
//! Gantree: L1_State → Photon
//!
//! A photon never owns an amplitude vector directly. It holds a `StateKey`
//! into the quantum manager, which may be shared with one partner photon.

use crate::constants::defaults;
use crate::types::{Encoding, PhotonId, SimTime, StateKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Photon travelling through the simulated network
/// Gantree: Photon // 광자
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photon {
    /// Unique identifier
    id: PhotonId,

    /// Label (cycle index for single photons, port name for pairs)
    /// Gantree: label: String // 이름
    label: String,

    /// Wavelength in nm
    wavelength_nm: f64,

    /// Encoding scheme
    /// Gantree: encoding: Encoding // 인코딩
    encoding: Encoding,

    /// Key of the state slot
    /// Gantree: state_key: StateKey // 상태 키
    state_key: StateKey,

    /// Absorptive placeholder flag
    /// Gantree: is_null: bool // 빈 쌍
    is_null: bool,

    /// Emission time in picoseconds
    emitted_at: SimTime,

    /// Name of the emitting entity
    location: String,
}

impl Photon {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a photon bound to `state_key`
    pub fn new(id: PhotonId, state_key: StateKey, encoding: Encoding) -> Self {
        Self {
            id,
            label: String::new(),
            wavelength_nm: defaults::WAVELENGTH_NM,
            encoding,
            state_key,
            is_null: false,
            emitted_at: 0,
            location: String::new(),
        }
    }

    /// Set label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set wavelength (nm)
    pub fn with_wavelength(mut self, wavelength_nm: f64) -> Self {
        self.wavelength_nm = wavelength_nm;
        self
    }

    /// Set emission time and emitting entity
    pub fn with_origin(mut self, emitted_at: SimTime, location: impl Into<String>) -> Self {
        self.emitted_at = emitted_at;
        self.location = location.into();
        self
    }

    /// Mark as absorptive placeholder
    pub fn with_null(mut self, is_null: bool) -> Self {
        self.is_null = is_null;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Photon id
    #[inline]
    pub fn id(&self) -> PhotonId {
        self.id
    }

    /// Photon label
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Relabel (source ports rename photons to their own name)
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Wavelength (nm)
    #[inline]
    pub fn wavelength(&self) -> f64 {
        self.wavelength_nm
    }

    /// Encoding scheme
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// State slot key
    #[inline]
    pub fn state_key(&self) -> StateKey {
        self.state_key
    }

    /// Absorptive placeholder flag
    #[inline]
    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// Emission time (ps)
    #[inline]
    pub fn emitted_at(&self) -> SimTime {
        self.emitted_at
    }

    /// Emitting entity name
    #[inline]
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for Photon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' [{}] {:.3}nm {} from '{}' at {}ps{}",
            self.id,
            self.label,
            self.encoding,
            self.wavelength_nm,
            self.state_key,
            self.location,
            self.emitted_at,
            if self.is_null { " (null)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let photon = Photon::new(PhotonId(3), StateKey(7), Encoding::Absorptive)
            .with_label("1")
            .with_wavelength(1549.5)
            .with_origin(12_500, "spdc")
            .with_null(true);

        assert_eq!(photon.id(), PhotonId(3));
        assert_eq!(photon.state_key(), StateKey(7));
        assert_eq!(photon.label(), "1");
        assert_eq!(photon.emitted_at(), 12_500);
        assert_eq!(photon.location(), "spdc");
        assert!(photon.is_null());
        assert!(photon.to_string().contains("(null)"));
    }

    #[test]
    fn test_relabel() {
        let mut photon = Photon::new(PhotonId(0), StateKey(0), Encoding::Polarization);
        assert_eq!(photon.wavelength(), defaults::WAVELENGTH_NM);
        photon.set_label("0");
        assert_eq!(photon.label(), "0");
    }
}
