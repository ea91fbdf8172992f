//! Battle setup configuration with documented defaults
//!
//! Only the shape of the battle lives here (roster size, formation, frame
//! pacing). Combat rules are fixed constants in `battle::constants`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{KotfError, Result};

/// Configuration for a single battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // === FORMATION ===
    /// Knights fielded by each side
    ///
    /// Laid out in a square-ish block of `ceil(sqrt(n))` columns.
    pub knights_per_side: usize,

    /// Distance between neighbouring knights in the starting block (world units)
    pub formation_spacing: f32,

    /// Starting advance-axis offset of team A's block
    pub team_a_start_x: f32,

    /// Starting advance-axis offset of team B's block
    pub team_b_start_x: f32,

    /// Fraction of knights that drift laterally instead of advancing straight
    ///
    /// At 0.3, roughly a third of each side curls around the flanks.
    pub flanking_fraction: f32,

    // === PACING ===
    /// Simulation time covered by one tick (milliseconds)
    ///
    /// Movement is per tick, timed effects are per millisecond, so this sets
    /// how far knights walk during a 300ms sword swing. 16ms matches 60fps.
    pub frame_ms: u64,

    /// Hard stop for headless runs
    pub max_ticks: u64,

    /// RNG seed. `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            knights_per_side: 64,
            formation_spacing: 2.0,
            team_a_start_x: -30.0,
            team_b_start_x: 30.0,
            flanking_fraction: 0.3,
            frame_ms: 16,
            max_ticks: 20_000,
            seed: None,
        }
    }
}

impl BattleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text. Missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BattleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.flanking_fraction) {
            return Err(KotfError::InvalidConfig(format!(
                "flanking_fraction ({}) must be within 0.0..=1.0",
                self.flanking_fraction
            )));
        }

        if self.formation_spacing <= 0.0 {
            return Err(KotfError::InvalidConfig(format!(
                "formation_spacing ({}) must be positive",
                self.formation_spacing
            )));
        }

        // Team A advances toward +x, so it has to start on the -x side
        if self.team_a_start_x >= self.team_b_start_x {
            return Err(KotfError::InvalidConfig(format!(
                "team_a_start_x ({}) should be < team_b_start_x ({})",
                self.team_a_start_x, self.team_b_start_x
            )));
        }

        if self.frame_ms == 0 {
            return Err(KotfError::InvalidConfig("frame_ms must be positive".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BattleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BattleConfig::from_toml_str("knights_per_side = 4\nseed = 7\n").unwrap();
        assert_eq!(config.knights_per_side, 4);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.frame_ms, 16);
        assert_eq!(config.formation_spacing, 2.0);
    }

    #[test]
    fn test_rejects_swapped_start_lines() {
        let result = BattleConfig::from_toml_str("team_a_start_x = 10.0\nteam_b_start_x = -10.0\n");
        assert!(matches!(result, Err(KotfError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_flanking_fraction() {
        let mut config = BattleConfig::default();
        config.flanking_fraction = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = BattleConfig::from_toml_str("knights_per_side = \"many\"");
        assert!(matches!(result, Err(KotfError::ConfigParse(_))));
    }
}
