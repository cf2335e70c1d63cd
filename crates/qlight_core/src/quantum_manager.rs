//! Joint-state arena for QLIGHT
//!
//! Gantree: L1_State → QuantumManager
//!
//! Maps every photon's `StateKey` to a slot holding an amplitude vector and
//! the set of keys that own it. Entangled photons share one slot; a single
//! photon owns a slot alone. Photons only ever hold keys.

use crate::constants::defaults;
use crate::error::{QlightError, QlightResult};
use crate::operator::{total_probability, Operator};
use crate::types::{Amplitude, PhotonId, StateKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a slot inside the arena
type SlotId = u64;

/// Amplitude vector plus its owners
/// Gantree: QuantumStateSlot // 상태 슬롯
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumStateSlot {
    /// Amplitudes over the tensor product of the owners' spaces
    amplitudes: Vec<Amplitude>,

    /// Owning keys, in tensor-factor order
    keys: Vec<StateKey>,
}

impl QuantumStateSlot {
    /// Amplitude vector
    pub fn amplitudes(&self) -> &[Amplitude] {
        &self.amplitudes
    }

    /// Owning keys in tensor-factor order
    pub fn keys(&self) -> &[StateKey] {
        &self.keys
    }

    /// State vector dimension
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Check if the slot is shared by more than one photon
    pub fn is_joint(&self) -> bool {
        self.keys.len() > 1
    }

    /// Total probability mass
    pub fn total_probability(&self) -> f64 {
        total_probability(&self.amplitudes)
    }
}

/// Global quantum-state manager
/// Gantree: QuantumManager // 상태 관리자
#[derive(Debug, Clone)]
pub struct QuantumManager {
    /// Fock-space truncation (max photon number per mode)
    /// Gantree: truncation: usize // 절단
    truncation: usize,

    /// key -> slot
    index: BTreeMap<StateKey, SlotId>,

    /// slot storage
    slots: BTreeMap<SlotId, QuantumStateSlot>,

    next_key: u64,
    next_slot: SlotId,
    next_photon: u64,
}

impl QuantumManager {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a manager with the given Fock truncation
    pub fn new(truncation: usize) -> QlightResult<Self> {
        if truncation == 0 {
            return Err(QlightError::InvalidConfiguration(
                "truncation must be at least 1".into(),
            ));
        }

        Ok(Self {
            truncation,
            index: BTreeMap::new(),
            slots: BTreeMap::new(),
            next_key: 0,
            next_slot: 0,
            next_photon: 0,
        })
    }

    /// Fock truncation
    #[inline]
    pub fn truncation(&self) -> usize {
        self.truncation
    }

    /// Local dimension of one Fock mode
    #[inline]
    pub fn fock_dim(&self) -> usize {
        self.truncation + 1
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    /// Allocate an id and an unbound state key for a new photon
    /// Gantree: allocate() -> (PhotonId,StateKey) // 키 발급
    pub fn allocate(&mut self) -> (PhotonId, StateKey) {
        let id = PhotonId(self.next_photon);
        let key = StateKey(self.next_key);
        self.next_photon += 1;
        self.next_key += 1;
        (id, key)
    }

    /// Bind `keys` to one shared slot holding `amplitudes`
    /// Gantree: set(keys,amps) -> Result<()> // 결합 상태 설정
    ///
    /// Keys are detached from whatever slot they held before. The vector must
    /// be normalized; its dimension is the product of the owners' spaces.
    pub fn set(&mut self, keys: &[StateKey], amplitudes: Vec<Amplitude>) -> QlightResult<()> {
        if keys.is_empty() {
            return Err(QlightError::InvalidConfiguration(
                "state must be bound to at least one key".into(),
            ));
        }
        Self::check_state(&amplitudes)?;

        for key in keys {
            self.detach(*key);
        }

        let slot_id = self.next_slot;
        self.next_slot += 1;
        self.slots.insert(
            slot_id,
            QuantumStateSlot {
                amplitudes,
                keys: keys.to_vec(),
            },
        );
        for key in keys {
            self.index.insert(*key, slot_id);
        }

        Ok(())
    }

    /// Check that `amplitudes` could be bound by `set`
    /// Gantree: check_state(amps) -> Result<()> // 상태 검증
    pub fn check_state(amplitudes: &[Amplitude]) -> QlightResult<()> {
        if amplitudes.len() < 2 {
            return Err(QlightError::UnsupportedStateDimension(amplitudes.len()));
        }
        let norm = total_probability(amplitudes);
        if (norm - 1.0).abs() > defaults::NORM_TOLERANCE {
            return Err(QlightError::NotNormalized(norm));
        }
        Ok(())
    }

    /// Remove a key; the slot is dropped with its last owner
    /// Gantree: release(key) // 해제
    pub fn release(&mut self, key: StateKey) -> QlightResult<()> {
        if !self.index.contains_key(&key) {
            return Err(QlightError::UnknownStateKey(key.0));
        }
        self.detach(key);
        Ok(())
    }

    fn detach(&mut self, key: StateKey) {
        let Some(slot_id) = self.index.remove(&key) else {
            return;
        };
        let now_empty = match self.slots.get_mut(&slot_id) {
            Some(slot) => {
                slot.keys.retain(|k| *k != key);
                slot.keys.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.slots.remove(&slot_id);
        }
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Slot referenced by `key`
    /// Gantree: get(key) -> &QuantumStateSlot // 조회
    pub fn get(&self, key: StateKey) -> QlightResult<&QuantumStateSlot> {
        self.index
            .get(&key)
            .and_then(|slot_id| self.slots.get(slot_id))
            .ok_or(QlightError::UnknownStateKey(key.0))
    }

    /// Amplitudes referenced by `key`
    pub fn amplitudes(&self, key: StateKey) -> QlightResult<&[Amplitude]> {
        Ok(self.get(key)?.amplitudes())
    }

    /// Other keys sharing the slot of `key`
    pub fn partners(&self, key: StateKey) -> QlightResult<Vec<StateKey>> {
        Ok(self
            .get(key)?
            .keys()
            .iter()
            .copied()
            .filter(|k| *k != key)
            .collect())
    }

    /// Apply an operator to the whole slot referenced by `key`
    /// Gantree: apply_operator(key,op) -> Result<()> // 연산 적용
    ///
    /// The operator must already be embedded in the slot's full space.
    pub fn apply_operator(&mut self, key: StateKey, operator: &Operator) -> QlightResult<()> {
        let slot_id = *self
            .index
            .get(&key)
            .ok_or(QlightError::UnknownStateKey(key.0))?;
        let slot = self
            .slots
            .get_mut(&slot_id)
            .ok_or(QlightError::UnknownStateKey(key.0))?;

        slot.amplitudes = operator.apply(&slot.amplitudes)?;
        Ok(())
    }

    /// Number of live slots
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of bound keys
    pub fn key_count(&self) -> usize {
        self.index.len()
    }
}

impl Default for QuantumManager {
    fn default() -> Self {
        Self {
            truncation: defaults::TRUNCATION,
            index: BTreeMap::new(),
            slots: BTreeMap::new(),
            next_key: 0,
            next_slot: 0,
            next_photon: 0,
        }
    }
}

impl fmt::Display for QuantumManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QuantumManager(truncation={}, slots={}, keys={})",
            self.truncation,
            self.slots.len(),
            self.index.len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
