//! Entity protocol for QLIGHT
//!
//! Gantree: L2_Kernel → Entity
//!
//! Anything that can receive a photon implements [`Entity`]. Entities live in
//! the timeline's arena and are addressed by [`EntityId`].

use crate::timeline::Timeline;
use qlight_core::{Photon, QlightError, QlightResult, Subsystem};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Index of an entity in the timeline arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Optional routing hints passed with a photon
/// Gantree: RoutingHints // 전달 힌트
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoutingHints {
    /// Subsystem a two-mode element should act on
    pub which: Option<Subsystem>,
}

impl RoutingHints {
    /// No hints
    pub const NONE: Self = Self { which: None };

    /// Target one subsystem
    pub fn which(subsystem: Subsystem) -> Self {
        Self {
            which: Some(subsystem),
        }
    }
}

/// Receiver of photons
/// Gantree: Entity // trait
pub trait Entity {
    /// Entity name
    fn name(&self) -> &str;

    /// Validate wiring before the simulation starts
    fn init(&mut self) -> QlightResult<()> {
        Ok(())
    }

    /// Receive a photon
    ///
    /// The entity is taken out of the arena for the duration of the call, so
    /// `timeline` is free to schedule events or forward synchronously to
    /// other entities.
    fn get(&mut self, photon: Photon, hints: &RoutingHints, timeline: &mut Timeline)
        -> QlightResult<()>;

    /// Upcast for typed inspection
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed inspection
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Check that an entity has exactly `expected` receivers
pub fn expect_receivers(name: &str, receivers: &[EntityId], expected: usize) -> QlightResult<()> {
    if receivers.len() != expected {
        return Err(QlightError::wiring(name, expected, receivers.len()));
    }
    Ok(())
}
