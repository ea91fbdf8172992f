//! Per-knight queue of timed effects
//!
//! Replaces fire-and-forget callbacks: every delayed transition is an entry
//! with a due time, drained by the battle's timer pump in due order.

use serde::{Deserialize, Serialize};

use crate::battle::roster::UnitRef;
use crate::core::types::SimTime;

/// A delayed transition owned by one knight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Cosmetic end of the sword swing
    LowerSword,
    /// Roll damage against the target and end the attacking flag
    DeliverStrike { target: UnitRef },
    /// Clear the in-combat flag
    LeaveCombat,
    EndBlock,
    EndDodge,
    EndHitFlash,
    /// One step of the repeating retreat
    RetreatStep,
    /// Take the corpse off the field (presentation only)
    RemoveFromField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEffect {
    pub due: SimTime,
    pub seq: u64,
    pub effect: Effect,
}

/// Pending effects for one knight, kept sorted by (due, seq)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pending: Vec<ScheduledEffect>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `effect` to fire at `due`. Equal due times fire in insertion order.
    pub fn push(&mut self, due: SimTime, effect: Effect) {
        let entry = ScheduledEffect {
            due,
            seq: self.next_seq,
            effect,
        };
        self.next_seq += 1;

        let index = self
            .pending
            .partition_point(|e| (e.due, e.seq) <= (entry.due, entry.seq));
        self.pending.insert(index, entry);
    }

    /// Earliest pending effect, if any
    pub fn peek(&self) -> Option<&ScheduledEffect> {
        self.pending.first()
    }

    /// Remove and return the earliest effect if it is due at or before `now`
    pub fn pop_due(&mut self, now: SimTime) -> Option<ScheduledEffect> {
        match self.pending.first() {
            Some(first) if first.due <= now => Some(self.pending.remove(0)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn contains(&self, effect: Effect) -> bool {
        self.pending.iter().any(|e| e.effect == effect)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEffect> {
        self.pending.iter()
    }
}
