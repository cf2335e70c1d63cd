//! Discrete-event timeline for QLIGHT
//!
//! Gantree: L2_Kernel → Timeline
//!
//! Owns the entity arena, the event queue, and the quantum manager.
//! Events dispatch in nondecreasing time order; ties keep insertion order.

use crate::entity::{Entity, EntityId, RoutingHints};
use crate::event::Event;
use crate::rng::EntityRng;
use qlight_core::{Photon, QlightError, QlightResult, QuantumManager, SimTime};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

/// Simulation timeline
/// Gantree: Timeline // 타임라인
pub struct Timeline {
    /// Current time (ps)
    /// Gantree: now: SimTime // 현재 시각
    now: SimTime,

    /// Next insertion sequence number
    next_seq: u64,

    /// Pending events (min-heap)
    /// Gantree: queue: BinaryHeap<Event> // 이벤트 큐
    queue: BinaryHeap<Reverse<Event>>,

    /// Entity arena; a slot is `None` while its entity executes
    entities: Vec<Option<Box<dyn Entity>>>,

    /// Entity names, kept while an entity is checked out
    names: Vec<String>,

    /// Joint-state arena
    /// Gantree: quantum_manager: QuantumManager // 상태 관리자
    quantum_manager: QuantumManager,

    /// Master seed for derived entity streams
    master_seed: u64,

    /// Number of dispatched events
    executed: u64,
}

impl Timeline {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a timeline with default truncation
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
            entities: Vec::new(),
            names: Vec::new(),
            quantum_manager: QuantumManager::default(),
            master_seed: 0,
            executed: 0,
        }
    }

    /// Create a timeline with a Fock truncation
    pub fn with_truncation(truncation: usize) -> QlightResult<Self> {
        let mut timeline = Self::new();
        timeline.quantum_manager = QuantumManager::new(truncation)?;
        Ok(timeline)
    }

    /// Set master seed for derived entity streams
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.master_seed = seed;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current simulation time (ps)
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Quantum manager
    #[inline]
    pub fn quantum_manager(&self) -> &QuantumManager {
        &self.quantum_manager
    }

    /// Mutable quantum manager
    #[inline]
    pub fn quantum_manager_mut(&mut self) -> &mut QuantumManager {
        &mut self.quantum_manager
    }

    /// Random stream derived from the master seed and `name`
    pub fn rng_for(&self, name: &str) -> EntityRng {
        EntityRng::for_entity(self.master_seed, name)
    }

    /// Number of pending events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of dispatched events
    pub fn executed(&self) -> u64 {
        self.executed
    }

    // ========================================================================
    // Entity Arena
    // ========================================================================

    /// Register an entity
    /// Gantree: add_entity(Box<dyn Entity>) -> EntityId // 등록
    pub fn add_entity(&mut self, entity: Box<dyn Entity>) -> EntityId {
        let id = EntityId(self.entities.len());
        self.names.push(entity.name().to_string());
        self.entities.push(Some(entity));
        id
    }

    /// Look up an entity id by name
    pub fn entity_id(&self, name: &str) -> Option<EntityId> {
        self.names.iter().position(|n| n == name).map(EntityId)
    }

    /// Name of an entity
    pub fn entity_name(&self, id: EntityId) -> QlightResult<&str> {
        self.names
            .get(id.0)
            .map(String::as_str)
            .ok_or(QlightError::UnknownEntity(id.0))
    }

    /// Typed access to an entity
    pub fn entity<T: Entity + 'static>(&self, id: EntityId) -> QlightResult<&T> {
        self.entities
            .get(id.0)
            .and_then(|slot| slot.as_deref())
            .and_then(|e| e.as_any().downcast_ref::<T>())
            .ok_or(QlightError::UnknownEntity(id.0))
    }

    /// Typed mutable access to an entity
    pub fn entity_mut<T: Entity + 'static>(&mut self, id: EntityId) -> QlightResult<&mut T> {
        self.entities
            .get_mut(id.0)
            .and_then(|slot| slot.as_deref_mut())
            .and_then(|e| e.as_any_mut().downcast_mut::<T>())
            .ok_or(QlightError::UnknownEntity(id.0))
    }

    /// Initialize every registered entity
    /// Gantree: init() -> Result<()> // 초기화
    pub fn init(&mut self) -> QlightResult<()> {
        for entity in self.entities.iter_mut().flatten() {
            entity.init()?;
        }
        log::debug!("Timeline initialized with {} entities", self.entities.len());
        Ok(())
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Schedule a photon delivery
    /// Gantree: schedule(time,target,photon,hints) -> Result<()> // 예약
    pub fn schedule(
        &mut self,
        time: SimTime,
        target: EntityId,
        photon: Photon,
        hints: RoutingHints,
    ) -> QlightResult<()> {
        if time < self.now {
            return Err(QlightError::ScheduleInPast {
                time,
                now: self.now,
            });
        }
        if target.0 >= self.entities.len() {
            return Err(QlightError::UnknownEntity(target.0));
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Event {
            time,
            seq,
            target,
            photon,
            hints,
        }));
        Ok(())
    }

    /// Deliver a photon immediately
    /// Gantree: deliver(target,photon,hints) -> Result<()> // 즉시 전달
    ///
    /// The target is checked out of the arena while it runs; delivering to
    /// an entity that is already running fails with `ReentrantDelivery`.
    pub fn deliver(
        &mut self,
        target: EntityId,
        photon: Photon,
        hints: RoutingHints,
    ) -> QlightResult<()> {
        let slot = self
            .entities
            .get_mut(target.0)
            .ok_or(QlightError::UnknownEntity(target.0))?;
        let mut entity = match slot.take() {
            Some(entity) => entity,
            None => {
                return Err(QlightError::ReentrantDelivery(
                    self.names[target.0].clone(),
                ))
            }
        };

        let result = entity.get(photon, &hints, self);
        self.entities[target.0] = Some(entity);
        result
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Dispatch the next event; returns false when the queue is empty
    pub fn step(&mut self) -> QlightResult<bool> {
        let Some(Reverse(event)) = self.queue.pop() else {
            return Ok(false);
        };

        self.now = event.time;
        self.executed += 1;
        log::trace!("Dispatching {}", event);
        self.deliver(event.target, event.photon, event.hints)?;
        Ok(true)
    }

    /// Run until the queue is empty
    /// Gantree: run() -> Result<u64> // 실행
    pub fn run(&mut self) -> QlightResult<u64> {
        self.run_until(SimTime::MAX)
    }

    /// Run events with time strictly before `stop_time`
    pub fn run_until(&mut self, stop_time: SimTime) -> QlightResult<u64> {
        let start = self.executed;
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.time >= stop_time {
                break;
            }
            self.step()?;
        }
        let dispatched = self.executed - start;
        log::debug!("Timeline ran {} events, now at {}ps", dispatched, self.now);
        Ok(dispatched)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .field("entities", &self.names)
            .field("quantum_manager", &self.quantum_manager)
            .finish()
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timeline(now={}ps, pending={}, entities={}, truncation={})",
            self.now,
            self.queue.len(),
            self.entities.len(),
            self.quantum_manager.truncation()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
