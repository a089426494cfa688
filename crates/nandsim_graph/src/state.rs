//! Double-buffered storage for sequential built-ins.
//!
//! Each sequential node owns one [`SequentialState`]. Its outputs only ever
//! read the committed buffer. Applying a clock edge stages writes in the
//! pending buffer, and nothing becomes visible until [`SequentialState::commit`].

use std::collections::HashMap;

use nandsim_ir::Primitive;
use serde::{Deserialize, Serialize};

/// Committed and pending values of a node's state slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequentialState {
    committed: HashMap<String, Vec<bool>>,
    pending: HashMap<String, Vec<bool>>,
}

impl SequentialState {
    /// Allocates every slot of `primitive`, zeroed, or returns `None` for a
    /// combinational built-in.
    pub fn for_primitive(primitive: Primitive) -> Option<Self> {
        let width = primitive.state_width()? as usize;
        let slots = primitive.state_slots();
        let mut committed = HashMap::with_capacity(slots.len());
        for slot in slots {
            committed.insert(slot, vec![false; width]);
        }
        Some(Self {
            committed,
            pending: HashMap::new(),
        })
    }

    /// The committed value of `slot`.
    pub fn get(&self, slot: &str) -> Option<&[bool]> {
        self.committed.get(slot).map(Vec::as_slice)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Returns `true` when the state has no slots.
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Drops all staged writes.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    /// Stages `value` for `slot`, replacing any earlier staged value.
    pub fn stage(&mut self, slot: impl Into<String>, value: Vec<bool>) {
        self.pending.insert(slot.into(), value);
    }

    /// Makes every staged write visible and clears the pending buffer.
    ///
    /// Writes to slots outside the layout are dropped.
    pub fn commit(&mut self) {
        for (slot, value) in self.pending.drain() {
            if let Some(current) = self.committed.get_mut(&slot) {
                *current = value;
            }
        }
    }
}
