//! Battle rule constants - all tunable values in one place
//!
//! Distances are world units, durations are simulation milliseconds,
//! speeds are world units per tick.

// Vitals
pub const MAX_HEALTH: f32 = 100.0;
pub const MAX_STAMINA: f32 = 100.0;
pub const STAMINA_RECOVERY: f32 = 0.5;

// Movement (per tick)
pub const MARCH_SPEED: f32 = 0.05;
pub const CHARGE_SPEED: f32 = 0.12;
pub const FLANK_DRIFT: f32 = 0.08;
pub const RETREAT_STEP: f32 = 0.1;
pub const RETREAT_STEP_MS: u64 = 100;

// Charge trigger: frontline separation along the advance axis
pub const CHARGE_DISTANCE: f32 = 20.0;

// Targeting
pub const ENGAGEMENT_RADIUS: f32 = 3.0;
pub const IN_COMBAT_DISCOUNT: f32 = 0.8;

// Attack timeline, relative to the swing
pub const SWING_RESET_MS: u64 = 200;
pub const STRIKE_DELAY_MS: u64 = 300;
pub const COMBAT_COOLDOWN_MS: u64 = 1500;

// Damage is uniform in [MIN_DAMAGE, MIN_DAMAGE + DAMAGE_SPREAD)
pub const MIN_DAMAGE: f32 = 5.0;
pub const DAMAGE_SPREAD: f32 = 20.0;

// Defense: block is rolled first, dodge only if the block roll fails
pub const BLOCK_CHANCE: f32 = 0.3;
pub const BLOCK_MIN_STAMINA: f32 = 20.0;
pub const BLOCK_MS: u64 = 300;
pub const DODGE_CHANCE: f32 = 0.2;
pub const DODGE_MIN_STAMINA: f32 = 30.0;
pub const DODGE_MS: u64 = 200;

// Retreat starts below RETREAT_HEALTH and ends once either recovery threshold is passed
pub const RETREAT_HEALTH: f32 = 30.0;
pub const RECOVERED_HEALTH: f32 = 50.0;
pub const RECOVERED_STAMINA: f32 = 60.0;

// Presentation cues
pub const HIT_FLASH_MS: u64 = 200;
pub const CORPSE_REMOVAL_MS: u64 = 1000;
