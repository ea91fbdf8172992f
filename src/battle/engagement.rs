//! Target selection for idle knights
//!
//! Two passes: the nearest fresh enemy within reach, and failing that the
//! nearest enemy while any ally is already fighting. Knights are therefore
//! drawn into existing scrums instead of standing idle beside them.

use crate::battle::constants::{ENGAGEMENT_RADIUS, IN_COMBAT_DISCOUNT};
use crate::battle::knight::Knight;

/// How a target was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    NearestEnemy,
    NearbyBattle,
}

/// Chosen enemy slot and how it was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetChoice {
    pub slot: usize,
    pub source: TargetSource,
}

/// Nearest enemy within the engagement radius.
///
/// Dead and retreating enemies are skipped. Enemies already fighting count as
/// 20% closer. Ties go to the earlier slot.
pub fn find_nearest_enemy(knight: &Knight, enemies: &[Knight]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (slot, enemy) in enemies.iter().enumerate() {
        if !enemy.is_alive() || enemy.is_retreating {
            continue;
        }

        let mut distance = knight.position.distance(&enemy.position);
        if enemy.in_combat {
            distance *= IN_COMBAT_DISCOUNT;
        }

        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((slot, distance));
        }
    }

    best.filter(|(_, distance)| *distance < ENGAGEMENT_RADIUS)
        .map(|(slot, _)| slot)
}

/// Nearest living enemy within the engagement radius, considered only while
/// at least one ally is in combat.
///
/// Distance is measured from `knight` itself, not from the fighting ally, and
/// retreating enemies are fair game here.
pub fn find_nearby_battle(knight: &Knight, allies: &[Knight], enemies: &[Knight]) -> Option<usize> {
    if !allies.iter().any(|ally| ally.in_combat) {
        return None;
    }

    let mut best: Option<(usize, f32)> = None;

    for (slot, enemy) in enemies.iter().enumerate() {
        if !enemy.is_alive() {
            continue;
        }

        let distance = knight.position.distance(&enemy.position);
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((slot, distance));
        }
    }

    best.filter(|(_, distance)| *distance < ENGAGEMENT_RADIUS)
        .map(|(slot, _)| slot)
}

/// Both passes in priority order
pub fn select_target(knight: &Knight, allies: &[Knight], enemies: &[Knight]) -> Option<TargetChoice> {
    if let Some(slot) = find_nearest_enemy(knight, enemies) {
        return Some(TargetChoice {
            slot,
            source: TargetSource::NearestEnemy,
        });
    }

    find_nearby_battle(knight, allies, enemies).map(|slot| TargetChoice {
        slot,
        source: TargetSource::NearbyBattle,
    })
}
