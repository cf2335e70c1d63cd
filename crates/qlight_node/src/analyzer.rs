//! Polarization analyzer
//!
//! Gantree: L5_Node → PolarizationAnalyzer
//!
//! A half-wave plate in front of a detector. The analyzer's entry entity
//! tags each photon with its configured `which` before handing it to the
//! plate, so it can sit on one arm of an entangled pair.

use qlight_core::{Photon, QlightResult, SimTime, Subsystem};
use qlight_kernel::{Entity, EntityId, PhotonRecorder, RoutingHints, Timeline};
use qlight_optics::{WavePlate, WavePlateConfig};
use std::any::Any;

/// Entry entity of an analyzer
/// Gantree: AnalyzerInput // 입력
#[derive(Debug, Clone)]
pub struct AnalyzerInput {
    name: String,
    which: Option<Subsystem>,
    plate: EntityId,
}

impl Entity for AnalyzerInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(
        &mut self,
        photon: Photon,
        hints: &RoutingHints,
        timeline: &mut Timeline,
    ) -> QlightResult<()> {
        let hints = RoutingHints {
            which: self.which.or(hints.which),
        };
        timeline.deliver(self.plate, photon, hints)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Half-wave plate followed by a detector
/// Gantree: PolarizationAnalyzer // 편광 분석기
#[derive(Debug, Clone, Copy)]
pub struct PolarizationAnalyzer {
    input: EntityId,
    plate: EntityId,
    detector: EntityId,
}

impl PolarizationAnalyzer {
    /// Register `<name>`, `<name>_HWP` and `<name>_detector` on `timeline`
    /// Gantree: build(name,angle,which,timeline) -> Result<Self> // 생성
    pub fn build(
        name: &str,
        angle: f64,
        which: Option<Subsystem>,
        timeline: &mut Timeline,
    ) -> QlightResult<Self> {
        let detector = timeline.add_entity(Box::new(PhotonRecorder::new(format!(
            "{}_detector",
            name
        ))));
        let plate = WavePlate::new(
            format!("{}_HWP", name),
            WavePlateConfig::half_wave(angle),
            timeline,
        )?
        .with_receiver(detector);
        let plate = timeline.add_entity(Box::new(plate));
        let input = timeline.add_entity(Box::new(AnalyzerInput {
            name: name.to_string(),
            which,
            plate,
        }));

        Ok(Self {
            input,
            plate,
            detector,
        })
    }

    /// Entity photons should be sent to
    pub fn input(&self) -> EntityId {
        self.input
    }

    /// Wave plate entity
    pub fn plate(&self) -> EntityId {
        self.plate
    }

    /// Detector entity
    pub fn detector(&self) -> EntityId {
        self.detector
    }

    /// Rotate the plate
    pub fn set_angle(&self, timeline: &mut Timeline, angle: f64) -> QlightResult<()> {
        timeline.entity_mut::<WavePlate>(self.plate)?.set_angle(angle);
        Ok(())
    }

    /// Arrival times at the detector
    /// Gantree: detection_times(timeline) -> Result<Vec<SimTime>> // 검출 시각
    pub fn detection_times(&self, timeline: &Timeline) -> QlightResult<Vec<SimTime>> {
        Ok(timeline
            .entity::<PhotonRecorder>(self.detector)?
            .arrival_times())
    }

    /// Photons detected so far
    pub fn detection_count(&self, timeline: &Timeline) -> QlightResult<usize> {
        Ok(timeline.entity::<PhotonRecorder>(self.detector)?.count())
    }
}

// ============================================================================
// Tests
// ============================================================================
