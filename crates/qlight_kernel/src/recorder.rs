//! Terminal photon sink for QLIGHT
//!
//! Gantree: L2_Kernel → PhotonRecorder
//!
//! Records every received photon with its arrival time and a snapshot of the
//! amplitudes its key referenced at that moment. The photon ends here, so its
//! key is released; a partner still in flight keeps the shared slot.

use crate::entity::{Entity, RoutingHints};
use crate::timeline::Timeline;
use qlight_core::{Amplitude, Photon, QlightResult, SimTime};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::path::Path;

/// One received photon
/// Gantree: Reception // 수신 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reception {
    /// Arrival time (ps)
    pub time: SimTime,

    /// Received photon
    pub photon: Photon,

    /// Amplitudes at arrival
    pub amplitudes: Vec<Amplitude>,

    /// Hints passed along with the photon
    pub hints: RoutingHints,
}

/// Sink entity that keeps every photon it receives
/// Gantree: PhotonRecorder // 수신기
#[derive(Debug, Clone, Default)]
pub struct PhotonRecorder {
    name: String,
    log: Vec<Reception>,
}

impl PhotonRecorder {
    /// Create an empty recorder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: Vec::new(),
        }
    }

    /// Received photons, in arrival order
    pub fn log(&self) -> &[Reception] {
        &self.log
    }

    /// Number of received photons
    pub fn count(&self) -> usize {
        self.log.len()
    }

    /// Arrival times, in arrival order
    pub fn arrival_times(&self) -> Vec<SimTime> {
        self.log.iter().map(|r| r.time).collect()
    }

    /// Forget everything received so far
    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Serialize the log to JSON
    pub fn to_json(&self) -> QlightResult<String> {
        Ok(serde_json::to_string_pretty(&self.log)?)
    }

    /// Write the log as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> QlightResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Entity for PhotonRecorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(
        &mut self,
        photon: Photon,
        hints: &RoutingHints,
        timeline: &mut Timeline,
    ) -> QlightResult<()> {
        let key = photon.state_key();
        let amplitudes = timeline.quantum_manager().amplitudes(key)?.to_vec();
        timeline.quantum_manager_mut().release(key)?;
        self.log.push(Reception {
            time: timeline.now(),
            photon,
            amplitudes,
            hints: *hints,
        });
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlight_core::{qubit, states, Encoding, QlightError};

    #[test]
    fn test_records_snapshot() {
        let mut tl = Timeline::new();
        let rec = tl.add_entity(Box::new(PhotonRecorder::new("det")));

        let (id, key) = tl.quantum_manager_mut().allocate();
        tl.quantum_manager_mut()
            .set(&[key], qubit(0.6, 0.8).to_vec())
            .unwrap();
        let photon = Photon::new(id, key, Encoding::Polarization);
        tl.schedule(42, rec, photon, RoutingHints::NONE).unwrap();
        tl.run().unwrap();

        let recorder = tl.entity::<PhotonRecorder>(rec).unwrap();
        assert_eq!(recorder.count(), 1);
        assert_eq!(recorder.arrival_times(), vec![42]);
        assert_eq!(recorder.log()[0].amplitudes, qubit(0.6, 0.8).to_vec());

        let json = recorder.to_json().unwrap();
        assert!(json.contains("\"time\": 42"));
        assert_eq!(tl.quantum_manager().key_count(), 0);
        assert_eq!(tl.quantum_manager().slot_count(), 0);
    }

    #[test]
    fn test_partner_keeps_slot() {
        let mut tl = Timeline::new();
        let rec = tl.add_entity(Box::new(PhotonRecorder::new("det")));

        let qm = tl.quantum_manager_mut();
        let (id0, k0) = qm.allocate();
        let (_, k1) = qm.allocate();
        qm.set(&[k0, k1], states::PSI_MINUS.to_vec()).unwrap();
        tl.schedule(0, rec, Photon::new(id0, k0, Encoding::Polarization), RoutingHints::NONE)
            .unwrap();
        tl.run().unwrap();

        let qm = tl.quantum_manager();
        assert_eq!(qm.slot_count(), 1);
        assert_eq!(qm.get(k1).unwrap().keys(), &[k1]);
        assert_eq!(qm.amplitudes(k1).unwrap(), &states::PSI_MINUS[..]);
        assert!(qm.get(k0).is_err());
    }

    #[test]
    fn test_unbound_key_fails() {
        let mut tl = Timeline::new();
        let rec = tl.add_entity(Box::new(PhotonRecorder::new("det")));
        let (id, key) = tl.quantum_manager_mut().allocate();
        tl.schedule(0, rec, Photon::new(id, key, Encoding::Fock), RoutingHints::NONE)
            .unwrap();
        assert_eq!(tl.run().unwrap_err(), QlightError::UnknownStateKey(key.0));
    }
}
