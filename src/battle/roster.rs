//! Teams and rosters
//!
//! A roster is arena storage: knights keep their slot for the whole battle,
//! dead ones included, so a `UnitRef` held by a pending strike never dangles.

use serde::{Deserialize, Serialize};

use crate::battle::knight::Knight;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    /// Sign of the advance direction along x
    pub fn forward(&self) -> f32 {
        match self {
            Team::A => 1.0,
            Team::B => -1.0,
        }
    }

    pub fn opponent(&self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

/// Stable handle to a knight: team plus slot in that team's roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitRef {
    pub team: Team,
    pub slot: usize,
}

impl UnitRef {
    pub fn new(team: Team, slot: usize) -> Self {
        Self { team, slot }
    }
}

/// Ordered collection of one team's knights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub team: Team,
    pub knights: Vec<Knight>,
}

impl Roster {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            knights: Vec::new(),
        }
    }

    /// Add a knight and return its handle
    pub fn push(&mut self, knight: Knight) -> UnitRef {
        self.knights.push(knight);
        UnitRef::new(self.team, self.knights.len() - 1)
    }

    pub fn get(&self, slot: usize) -> Option<&Knight> {
        self.knights.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Knight> {
        self.knights.get_mut(slot)
    }

    pub fn len(&self) -> usize {
        self.knights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knights.is_empty()
    }

    pub fn living(&self) -> impl Iterator<Item = &Knight> {
        self.knights.iter().filter(|k| k.is_alive())
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    pub fn all_dead(&self) -> bool {
        self.living_count() == 0
    }
}
