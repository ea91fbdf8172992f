//! Advance and charge
//!
//! Knights walk straight at the enemy (plus flank drift) until the two
//! frontlines close within `CHARGE_DISTANCE`, then everyone still standing
//! breaks into a charge.

use crate::battle::constants::CHARGE_DISTANCE;
use crate::battle::roster::Roster;

/// Advance every knight of the roster one tick. Returns how many moved.
pub fn advance_roster(roster: &mut Roster) -> usize {
    let direction = roster.team.forward();
    roster
        .knights
        .iter_mut()
        .map(|knight| knight.advance(direction))
        .filter(|moved| *moved)
        .count()
}

/// Advance-axis position of the most advanced knight. Fallen knights still
/// mark where the line got to.
pub fn frontline(roster: &Roster) -> Option<f32> {
    let forward = roster.team.forward();
    roster
        .knights
        .iter()
        .map(|k| k.position.x * forward)
        .fold(None, |front: Option<f32>, x| Some(front.map_or(x, |f| f.max(x))))
        .map(|front| front * forward)
}

/// Distance between the two frontlines, if both sides fielded anyone
pub fn frontline_gap(a: &Roster, b: &Roster) -> Option<f32> {
    Some((frontline(a)? - frontline(b)?).abs())
}

pub fn should_charge(a: &Roster, b: &Roster) -> bool {
    frontline_gap(a, b).is_some_and(|gap| gap < CHARGE_DISTANCE)
}

/// Put every eligible knight into the charge. Returns how many started.
pub fn sound_charge(roster: &mut Roster) -> usize {
    roster
        .knights
        .iter_mut()
        .filter(|k| !k.is_dead && !k.is_attacking)
        .map(|k| k.begin_charge())
        .filter(|started| *started)
        .count()
}
