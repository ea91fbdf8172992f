pub mod config;
pub mod error;
pub mod types;

pub use config::BattleConfig;
pub use error::{KotfError, Result};
pub use types::{SimTime, Tick, Vec2};
