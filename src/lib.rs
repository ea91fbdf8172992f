//! Kotf - emergent melee between two knight formations

pub mod battle;
pub mod core;
