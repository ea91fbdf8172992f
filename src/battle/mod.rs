//! Battle system - two formations of knights meeting in open field
//!
//! No commanders and no orders: every knight decides locally whether to
//! advance, charge, swing, or fall back, and the melee emerges from that.

pub mod constants;
pub mod engagement;
pub mod execution;
pub mod formation_layout;
pub mod knight;
pub mod movement;
pub mod roster;
pub mod schedule;

// Re-exports for convenient access
pub use constants::*;
pub use engagement::{find_nearby_battle, find_nearest_enemy, select_target, TargetChoice, TargetSource};
pub use execution::{
    check_battle_end, BattleEvent, BattleEventType, BattleOutcome, BattlePhase, BattleState,
    KnightView,
};
pub use formation_layout::{block_position, deploy_roster, roll_flank_direction, row_size};
pub use knight::{roll_damage, DamageOutcome, DefenseOutcome, Knight, Posture, RetreatProgress};
pub use movement::{advance_roster, frontline, frontline_gap, should_charge, sound_charge};
pub use roster::{Roster, Team, UnitRef};
pub use schedule::{Effect, Schedule, ScheduledEffect};
