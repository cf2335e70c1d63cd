//! Delivery events for QLIGHT
//!
//! Gantree: L2_Kernel → Event
//!
//! Events order by time, then by insertion sequence, so two events at the
//! same timestamp run in the order they were scheduled.

use crate::entity::{EntityId, RoutingHints};
use qlight_core::{Photon, SimTime};
use std::cmp::Ordering;
use std::fmt;

/// Photon delivery scheduled on the timeline
/// Gantree: Event // 이벤트
#[derive(Debug, Clone)]
pub struct Event {
    /// Dispatch time in picoseconds
    /// Gantree: time: SimTime // 실행 시각
    pub time: SimTime,

    /// Insertion sequence (tie breaker)
    /// Gantree: seq: u64 // 삽입 순서
    pub seq: u64,

    /// Receiving entity
    pub target: EntityId,

    /// Photon to deliver
    pub photon: Photon,

    /// Routing hints passed to `get`
    pub hints: RoutingHints,
}

impl Event {
    /// Ordering key
    #[inline]
    pub fn key(&self) -> (SimTime, u64) {
        (self.time, self.seq)
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}ps #{}] {} -> {}",
            self.time,
            self.seq,
            self.photon.id(),
            self.target
        )
    }
}
