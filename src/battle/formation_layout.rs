//! Starting formations
//!
//! Each side deploys as a square-ish block centred on its start line. A share
//! of the knights are flankers that drift sideways while they advance.

use rand::Rng;

use crate::battle::knight::Knight;
use crate::battle::roster::{Roster, Team};
use crate::core::config::BattleConfig;
use crate::core::types::Vec2;

/// Columns per row for a block of `count` knights
pub fn row_size(count: usize) -> usize {
    (count as f32).sqrt().ceil().max(1.0) as usize
}

/// Starting position of the knight at `index` in a block of `count`
pub fn block_position(index: usize, count: usize, start_x: f32, spacing: f32) -> Vec2 {
    let row_size = row_size(count);
    let row = index / row_size;
    let col = index % row_size;
    let width = row_size as f32;

    Vec2::new(
        start_x + (col as f32 * spacing - width),
        row as f32 * spacing - width / 2.0,
    )
}

/// -1 or +1 for a flanker, 0 for a knight holding the line
pub fn roll_flank_direction<R: Rng + ?Sized>(rng: &mut R, flanking_fraction: f32) -> f32 {
    if rng.gen::<f32>() < flanking_fraction {
        if rng.gen::<f32>() > 0.5 {
            1.0
        } else {
            -1.0
        }
    } else {
        0.0
    }
}

/// Deploy one side's block
pub fn deploy_roster<R: Rng + ?Sized>(team: Team, config: &BattleConfig, rng: &mut R) -> Roster {
    let start_x = match team {
        Team::A => config.team_a_start_x,
        Team::B => config.team_b_start_x,
    };

    let mut roster = Roster::new(team);
    for index in 0..config.knights_per_side {
        let position = block_position(index, config.knights_per_side, start_x, config.formation_spacing);
        let flank_direction = roll_flank_direction(rng, config.flanking_fraction);
        roster.push(Knight::new(team, position, flank_direction));
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_row_size() {
        assert_eq!(row_size(64), 8);
        assert_eq!(row_size(10), 4);
        assert_eq!(row_size(1), 1);
        assert_eq!(row_size(0), 1);
    }

    #[test]
    fn test_block_layout_matches_default_formation() {
        // 64 knights, spacing 2: 8 columns, offset back by the row width
        let first = block_position(0, 64, -30.0, 2.0);
        assert_eq!(first, Vec2::new(-38.0, -4.0));

        let ninth = block_position(9, 64, -30.0, 2.0);
        assert_eq!(ninth, Vec2::new(-36.0, -2.0));
    }

    #[test]
    fn test_deploy_fills_roster() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = BattleConfig::default();
        let roster = deploy_roster(Team::B, &config, &mut rng);

        assert_eq!(roster.len(), 64);
        assert!(roster.knights.iter().all(|k| k.team == Team::B));
        assert!(roster.knights.iter().all(|k| k.position.x > 0.0));
    }

    #[test]
    fn test_no_flankers_when_fraction_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = BattleConfig {
            flanking_fraction: 0.0,
            ..BattleConfig::default()
        };
        let roster = deploy_roster(Team::A, &config, &mut rng);
        assert!(roster.knights.iter().all(|k| k.flank_offset == 0.0));
    }

    #[test]
    fn test_all_flankers_when_fraction_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let direction = roll_flank_direction(&mut rng, 1.0);
            assert!(direction == 1.0 || direction == -1.0);
        }
    }
}
