//! Source node
//!
//! Gantree: L5_Node → SourceNode
//!
//! An SPDC pair source wired to two ports. Each port relabels the photon
//! with its own name ("0" or "1") and hands it to the node relay, which
//! counts emissions on port "0" and routes every photon to the output
//! connected under its label.

use crate::config::SourceNodeConfig;
use qlight_core::{Photon, QlightError, QlightResult, QubitState, SimTime};
use qlight_kernel::{Entity, EntityId, RoutingHints, Timeline};
use qlight_source::PairSource;
use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// SourcePort
// ============================================================================

/// Output port of a source node
/// Gantree: SourcePort // 포트
#[derive(Debug, Clone)]
pub struct SourcePort {
    name: String,

    /// Label written on every passing photon
    port: String,

    /// Node relay
    relay: EntityId,
}

impl SourcePort {
    /// Create a port forwarding to `relay`
    pub fn new(name: impl Into<String>, port: impl Into<String>, relay: EntityId) -> Self {
        Self {
            name: name.into(),
            port: port.into(),
            relay,
        }
    }

    /// Port label
    pub fn port(&self) -> &str {
        &self.port
    }
}

impl Entity for SourcePort {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(
        &mut self,
        mut photon: Photon,
        hints: &RoutingHints,
        timeline: &mut Timeline,
    ) -> QlightResult<()> {
        photon.set_label(self.port.as_str());
        timeline.deliver(self.relay, photon, *hints)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ============================================================================
// SourceNodeRelay
// ============================================================================

/// Node-level receiver: bookkeeping and label routing
/// Gantree: SourceNodeRelay // 노드 중계
#[derive(Debug, Clone, Default)]
pub struct SourceNodeRelay {
    name: String,

    /// Pairs seen on port "0"
    /// Gantree: emission_count: u64 // 방출 수
    emission_count: u64,

    /// Arrival times on port "0"
    /// Gantree: timestamps: Vec<SimTime> // 타임스탬프
    timestamps: Vec<SimTime>,

    /// Output per port index
    outputs: Vec<Option<EntityId>>,
}

impl SourceNodeRelay {
    /// Create a relay with no outputs
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Route photons labelled `port` to `target`
    pub fn connect(&mut self, port: usize, target: EntityId) {
        if self.outputs.len() <= port {
            self.outputs.resize(port + 1, None);
        }
        self.outputs[port] = Some(target);
    }

    /// Pairs seen on port "0"
    pub fn emission_count(&self) -> u64 {
        self.emission_count
    }

    /// Arrival times on port "0"
    pub fn timestamps(&self) -> &[SimTime] {
        &self.timestamps
    }
}

impl Entity for SourceNodeRelay {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(
        &mut self,
        photon: Photon,
        hints: &RoutingHints,
        timeline: &mut Timeline,
    ) -> QlightResult<()> {
        let port: usize = photon.label().parse().map_err(|_| {
            QlightError::InvalidConfiguration(format!(
                "{} received photon with non-port label '{}'",
                self.name,
                photon.label()
            ))
        })?;

        if port == 0 {
            self.emission_count += 1;
            self.timestamps.push(timeline.now());
        }

        match self.outputs.get(port).copied().flatten() {
            Some(target) => timeline.deliver(target, photon, *hints),
            None => {
                log::debug!(
                    "{} has no output on port {}, dropping {}",
                    self.name,
                    port,
                    photon.id()
                );
                timeline.quantum_manager_mut().release(photon.state_key())
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ============================================================================
// SourceNode
// ============================================================================

/// Pair source with two labelled ports
/// Gantree: SourceNode // 광원 노드
#[derive(Debug, Clone)]
pub struct SourceNode {
    name: String,

    /// Gantree: spdc: PairSource // SPDC 광원
    spdc: PairSource,

    /// Port entities "0" and "1"
    ports: [EntityId; 2],

    /// Relay entity
    relay: EntityId,
}

impl SourceNode {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Build the node and register its entities on `timeline`
    /// Gantree: build(name,config,timeline) -> Result<Self> // 생성
    pub fn build(
        name: impl Into<String>,
        config: &SourceNodeConfig,
        timeline: &mut Timeline,
    ) -> QlightResult<Self> {
        let name = name.into();
        let spdc_name = format!("{}_SPDC", name);
        let pair_config = config.to_pair_config(&spdc_name)?;
        let mut spdc = PairSource::new(spdc_name, pair_config, timeline)?;

        let relay = timeline.add_entity(Box::new(SourceNodeRelay::new(name.as_str())));
        let ports = [0usize, 1].map(|i| {
            let port = SourcePort::new(format!("{}_port{}", name, i), i.to_string(), relay);
            timeline.add_entity(Box::new(port))
        });
        for port in ports {
            spdc.add_receiver(port);
        }
        spdc.init()?;

        log::info!("{} built: {}", name, spdc);
        Ok(Self {
            name,
            spdc,
            ports,
            relay,
        })
    }

    // ========================================================================
    // Wiring
    // ========================================================================

    /// Route photons leaving port `port` (0 or 1) to `target`
    /// Gantree: connect(timeline,port,target) -> Result<()> // 출력 연결
    pub fn connect(
        &self,
        timeline: &mut Timeline,
        port: usize,
        target: EntityId,
    ) -> QlightResult<()> {
        if port > 1 {
            return Err(QlightError::InvalidConfiguration(format!(
                "{} has ports 0 and 1, got {}",
                self.name, port
            )));
        }
        timeline
            .entity_mut::<SourceNodeRelay>(self.relay)?
            .connect(port, target);
        Ok(())
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Emit one cycle per state (polarization pairs) or per entry
    pub fn emit(&mut self, timeline: &mut Timeline, states: &[QubitState]) -> QlightResult<()> {
        self.spdc.emit(timeline, states)
    }

    /// Emit `num_pulses` cycles of a state-free encoding
    pub fn emit_pulses(&mut self, timeline: &mut Timeline, num_pulses: usize) -> QlightResult<()> {
        self.spdc.emit_pulses(timeline, num_pulses)
    }

    // ========================================================================
    // Bookkeeping
    // ========================================================================

    fn relay<'a>(&self, timeline: &'a Timeline) -> QlightResult<&'a SourceNodeRelay> {
        timeline.entity::<SourceNodeRelay>(self.relay)
    }

    /// Pairs seen on port "0"
    pub fn emission_count(&self, timeline: &Timeline) -> QlightResult<u64> {
        Ok(self.relay(timeline)?.emission_count())
    }

    /// Arrival times on port "0"
    pub fn timestamps(&self, timeline: &Timeline) -> QlightResult<Vec<SimTime>> {
        Ok(self.relay(timeline)?.timestamps().to_vec())
    }

    /// Write `<name>_timestamps.json` into `directory`, creating it if needed
    /// Gantree: export_timestamps(timeline,dir) -> Result<PathBuf> // 기록 저장
    pub fn export_timestamps(
        &self,
        timeline: &Timeline,
        directory: impl AsRef<Path>,
    ) -> QlightResult<PathBuf> {
        let directory = directory.as_ref();
        std::fs::create_dir_all(directory)?;
        let path = directory.join(format!("{}_timestamps.json", self.name));
        let json = serde_json::to_string_pretty(self.relay(timeline)?.timestamps())?;
        std::fs::write(&path, json)?;
        log::info!("{} exported timestamps to {}", self.name, path.display());
        Ok(path)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pair source
    pub fn spdc(&self) -> &PairSource {
        &self.spdc
    }

    /// Mutable pair source
    pub fn spdc_mut(&mut self) -> &mut PairSource {
        &mut self.spdc
    }

    /// Port entities
    pub fn ports(&self) -> [EntityId; 2] {
        self.ports
    }
}

impl fmt::Display for SourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceNode('{}', {})", self.name, self.spdc)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qlight_core::{qubit, states, Encoding};
    use qlight_kernel::PhotonRecorder;
    use qlight_source::{BellState, PairEncoding};

    fn node(json: &str, tl: &mut Timeline) -> SourceNode {
        let config = SourceNodeConfig::from_json(json).unwrap();
        SourceNode::build("src", &config, tl).unwrap()
    }

    #[test]
    fn test_configuration_loaded() {
        let mut tl = Timeline::new();
        let json = r#"{
            "wavelengths": [1550, 1550],
            "frequency": "8e6",
            "mean_photon_num": "0.1",
            "phase_error": "0.0",
            "bandwidth": "0"
        }"#;
        let mut src = node(json, &mut tl);

        assert_eq!(src.spdc().name(), "src_SPDC");
        assert_eq!(src.spdc().wavelengths(), [1550.0, 1550.0]);
        assert_eq!(src.spdc().config().frequency_hz, 8e6);
        assert_eq!(src.spdc().config().mean_photon_num, 0.1);
        assert_eq!(src.spdc().encoding(), PairEncoding::Polarization);

        src.spdc_mut().set_wavelengths(1540.0, 1560.0);
        assert_eq!(src.spdc().wavelengths(), [1540.0, 1560.0]);
    }

    #[test]
    fn test_unknown_encoding_fails_at_build() {
        let mut tl = Timeline::new();
        let config = SourceNodeConfig::default().with_encoding("time_bin");
        let err = SourceNode::build("src", &config, &mut tl).unwrap_err();
        assert!(matches!(err, QlightError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn test_emits_and_routes_by_port() {
        let mut tl = Timeline::new().with_seed(12);
        let mut src = node(r#"{"frequency": "1e6", "mean_photon_num": "1"}"#, &mut tl);
        let spy0 = tl.add_entity(Box::new(PhotonRecorder::new("spy0")));
        let spy1 = tl.add_entity(Box::new(PhotonRecorder::new("spy1")));
        src.connect(&mut tl, 0, spy0).unwrap();
        src.connect(&mut tl, 1, spy1).unwrap();

        let state_list: Vec<QubitState> = (0..50)
            .map(|i| states::POLARIZATION_BASES[i % 2][(i / 3) % 2])
            .collect();
        src.emit(&mut tl, &state_list).unwrap();
        tl.run().unwrap();

        let got0 = tl.entity::<PhotonRecorder>(spy0).unwrap().log();
        let got1 = tl.entity::<PhotonRecorder>(spy1).unwrap().log();
        assert!(!got0.is_empty());
        assert_eq!(got0.len(), got1.len());
        assert!(got0.iter().all(|r| r.photon.label() == "0"));
        assert!(got1.iter().all(|r| r.photon.label() == "1"));

        assert_eq!(src.emission_count(&tl).unwrap(), got0.len() as u64);
        assert_eq!(src.emission_count(&tl).unwrap(), src.spdc().photon_counter());
        let arrivals = tl.entity::<PhotonRecorder>(spy0).unwrap().arrival_times();
        assert_eq!(src.timestamps(&tl).unwrap(), arrivals);
    }

    #[test]
    fn test_relay_routes_by_label() {
        let mut tl = Timeline::new();
        let a = tl.add_entity(Box::new(PhotonRecorder::new("a")));
        let b = tl.add_entity(Box::new(PhotonRecorder::new("b")));
        let mut relay = SourceNodeRelay::new("node");
        relay.connect(0, a);
        relay.connect(1, b);
        let relay = tl.add_entity(Box::new(relay));

        for label in ["0", "1", "1"] {
            let (id, key) = tl.quantum_manager_mut().allocate();
            tl.quantum_manager_mut()
                .set(&[key], qubit(1.0, 0.0).to_vec())
                .unwrap();
            let photon = Photon::new(id, key, Encoding::Polarization).with_label(label);
            tl.schedule(7, relay, photon, RoutingHints::NONE).unwrap();
        }
        tl.run().unwrap();

        assert_eq!(tl.entity::<PhotonRecorder>(a).unwrap().count(), 1);
        assert_eq!(tl.entity::<PhotonRecorder>(b).unwrap().count(), 2);
        let relay = tl.entity::<SourceNodeRelay>(relay).unwrap();
        assert_eq!(relay.emission_count(), 1);
        assert_eq!(relay.timestamps(), &[7]);
    }

    #[test]
    fn test_unconnected_port_drops() {
        let mut tl = Timeline::new().with_seed(4);
        let config = SourceNodeConfig::default()
            .with_bell_state("phi+")
            .with_mean_photon_num(2.0);
        let mut src = SourceNode::build("src", &config, &mut tl).unwrap();
        src.emit_pulses(&mut tl, 10).unwrap();
        tl.run().unwrap();

        assert_eq!(src.spdc().encoding(), PairEncoding::Bell(BellState::PhiPlus));
        assert_eq!(src.emission_count(&tl).unwrap(), src.spdc().photon_counter());
        assert!(src.connect(&mut tl, 2, EntityId(0)).is_err());
    }

    #[test]
    fn test_dropped_photons_release_state() {
        let mut tl = Timeline::new().with_seed(17);
        let config = SourceNodeConfig::default()
            .with_bell_state("phi+")
            .with_mean_photon_num(2.0);
        let mut src = SourceNode::build("src", &config, &mut tl).unwrap();
        src.emit_pulses(&mut tl, 1000).unwrap();
        assert_eq!(
            tl.quantum_manager().slot_count() as u64,
            src.spdc().photon_counter()
        );
        tl.run().unwrap();

        assert!(src.spdc().photon_counter() > 1000);
        assert_eq!(tl.quantum_manager().slot_count(), 0);
        assert_eq!(tl.quantum_manager().key_count(), 0);
    }

    #[test]
    fn test_one_port_connected_frees_both_photons() {
        let mut tl = Timeline::new().with_seed(18);
        let config = SourceNodeConfig::default()
            .with_bell_state("psi-")
            .with_mean_photon_num(1.0);
        let mut src = SourceNode::build("src", &config, &mut tl).unwrap();
        let det = tl.add_entity(Box::new(PhotonRecorder::new("det")));
        src.connect(&mut tl, 1, det).unwrap();
        src.emit_pulses(&mut tl, 50).unwrap();
        tl.run().unwrap();

        let got = tl.entity::<PhotonRecorder>(det).unwrap().count() as u64;
        assert_eq!(got, src.spdc().photon_counter());
        assert_eq!(tl.quantum_manager().slot_count(), 0);
    }

    #[test]
    fn test_export_timestamps() {
        let mut tl = Timeline::new().with_seed(6);
        let config = SourceNodeConfig::default()
            .with_bell_state("psi-")
            .with_frequency(1e6)
            .with_mean_photon_num(1.0);
        let mut src = SourceNode::build("alice_src", &config, &mut tl).unwrap();
        src.emit_pulses(&mut tl, 20).unwrap();
        tl.run().unwrap();

        let dir = std::env::temp_dir().join(format!("qlight_export_{}", std::process::id()));
        let path = src.export_timestamps(&tl, &dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "alice_src_timestamps.json");

        let content = std::fs::read_to_string(&path).unwrap();
        let saved: Vec<SimTime> = serde_json::from_str(&content).unwrap();
        assert_eq!(saved, src.timestamps(&tl).unwrap());
        assert!(saved.iter().all(|t| t % 1_000_000 == 0));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
