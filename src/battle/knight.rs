//! A single knight: vitals, combat flags and timed transitions
//!
//! Flags are stored individually because they genuinely combine (a knight can
//! be blocking mid-swing, or attacking while retreating). `Posture` is the
//! single-state summary handed to renderers.
//!
//! Every delayed transition goes into the knight's `Schedule` and is applied by
//! the battle's timer pump. Death does not cancel pending entries; each entry
//! only touches the flag it owns.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::*;
use crate::battle::roster::{Team, UnitRef};
use crate::battle::schedule::{Effect, Schedule};
use crate::core::types::{SimTime, Vec2};

/// Summary state for presentation, highest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Posture {
    Dead,
    Retreating,
    Attacking,
    Blocking,
    Dodging,
    /// Free to advance
    Moving,
    /// Holding in place between swings
    Idle,
}

/// How an incoming blow was resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DefenseOutcome {
    Blocked,
    Dodged,
    Struck(DamageOutcome),
    /// Target was already dead
    Ignored,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub amount: f32,
    pub killed: bool,
    pub began_retreat: bool,
}

/// Result of one repeating retreat step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetreatProgress {
    Stepped,
    Recovered,
    /// Knight died mid-retreat; the step stops without moving
    Abandoned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Knight {
    pub team: Team,
    pub position: Vec2,
    pub health: f32,
    pub stamina: f32,
    /// Lateral drift applied on every advance (0 for knights holding the line)
    pub flank_offset: f32,

    // Combat flags
    pub is_attacking: bool,
    pub is_blocking: bool,
    pub is_dodging: bool,
    pub is_retreating: bool,
    pub is_dead: bool,
    pub in_combat: bool,
    pub is_charging: bool,

    // Presentation cues, never read by the decision logic
    pub sword_raised: bool,
    pub hit_flash: bool,
    pub fallen: bool,
    pub removed: bool,

    pub schedule: Schedule,
}

impl Knight {
    /// `flank_direction` is -1, 0 or +1
    pub fn new(team: Team, position: Vec2, flank_direction: f32) -> Self {
        Self {
            team,
            position,
            health: MAX_HEALTH,
            stamina: MAX_STAMINA,
            flank_offset: flank_direction * FLANK_DRIFT,
            is_attacking: false,
            is_blocking: false,
            is_dodging: false,
            is_retreating: false,
            is_dead: false,
            in_combat: false,
            is_charging: false,
            sword_raised: false,
            hit_flash: false,
            fallen: false,
            removed: false,
            schedule: Schedule::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead && self.health > 0.0
    }

    /// Can be picked as an attacker this tick
    pub fn is_ready_to_engage(&self) -> bool {
        self.is_alive() && !self.in_combat
    }

    pub fn can_advance(&self) -> bool {
        !self.is_dead && !self.is_attacking && !self.is_dodging && !self.is_retreating && !self.in_combat
    }

    pub fn posture(&self) -> Posture {
        if self.is_dead {
            Posture::Dead
        } else if self.is_retreating {
            Posture::Retreating
        } else if self.is_attacking {
            Posture::Attacking
        } else if self.is_blocking {
            Posture::Blocking
        } else if self.is_dodging {
            Posture::Dodging
        } else if self.in_combat {
            Posture::Idle
        } else {
            Posture::Moving
        }
    }

    /// Step along the advance axis (`direction` is the team's sign) and drift
    /// toward the flank. Returns whether the knight moved.
    pub fn advance(&mut self, direction: f32) -> bool {
        if !self.can_advance() {
            return false;
        }

        let speed = if self.is_charging { CHARGE_SPEED } else { MARCH_SPEED };
        self.position.x += direction * speed;
        self.position.y += self.flank_offset;
        self.recover_stamina();
        true
    }

    pub fn recover_stamina(&mut self) {
        if self.stamina < MAX_STAMINA {
            self.stamina += STAMINA_RECOVERY;
        }
    }

    /// Switch to charging pace. Lasts until death.
    pub fn begin_charge(&mut self) -> bool {
        if self.is_dead || self.is_charging || self.is_attacking {
            return false;
        }
        self.is_charging = true;
        tracing::debug!(team = ?self.team, "knight is charging");
        true
    }

    /// Start a swing at `target`. The blow lands `STRIKE_DELAY_MS` later;
    /// damage is rolled then, not now.
    pub fn attack(&mut self, target: UnitRef, now: SimTime) -> bool {
        if self.is_dead || self.is_attacking {
            return false;
        }

        self.in_combat = true;
        self.is_attacking = true;
        self.sword_raised = true;

        self.schedule.push(now + SWING_RESET_MS, Effect::LowerSword);
        self.schedule.push(now + STRIKE_DELAY_MS, Effect::DeliverStrike { target });
        self.schedule.push(now + COMBAT_COOLDOWN_MS, Effect::LeaveCombat);
        true
    }

    /// The swing has landed (or whiffed); free to swing again
    pub fn finish_strike(&mut self) {
        self.is_attacking = false;
    }

    /// Resolve an incoming blow: block roll, then dodge roll, then damage.
    ///
    /// The rolls are independent draws, so a blow is blocked ~30% of the time,
    /// dodged ~14% and lands ~56% at full stamina. Stamina is checked but not
    /// spent.
    pub fn defend_or_take_damage<R: Rng + ?Sized>(
        &mut self,
        amount: f32,
        now: SimTime,
        rng: &mut R,
    ) -> DefenseOutcome {
        if self.is_dead {
            return DefenseOutcome::Ignored;
        }

        if rng.gen::<f32>() < BLOCK_CHANCE && self.stamina > BLOCK_MIN_STAMINA {
            self.is_blocking = true;
            self.schedule.push(now + BLOCK_MS, Effect::EndBlock);
            DefenseOutcome::Blocked
        } else if rng.gen::<f32>() < DODGE_CHANCE && self.stamina > DODGE_MIN_STAMINA {
            self.is_dodging = true;
            self.schedule.push(now + DODGE_MS, Effect::EndDodge);
            DefenseOutcome::Dodged
        } else {
            DefenseOutcome::Struck(self.take_damage(amount, now))
        }
    }

    /// Apply damage in full. Death is checked before the retreat check.
    pub fn take_damage(&mut self, amount: f32, now: SimTime) -> DamageOutcome {
        if self.is_dead {
            return DamageOutcome::default();
        }

        self.health -= amount;
        self.hit_flash = true;
        self.schedule.push(now + HIT_FLASH_MS, Effect::EndHitFlash);

        let killed = self.health <= 0.0 && self.die(now);
        let began_retreat = self.retreat(now);

        DamageOutcome {
            amount,
            killed,
            began_retreat,
        }
    }

    /// Fall back toward the own lines while badly hurt
    pub fn retreat(&mut self, now: SimTime) -> bool {
        if self.is_dead || self.is_retreating || self.health >= RETREAT_HEALTH {
            return false;
        }

        self.is_retreating = true;
        self.schedule.push(now + RETREAT_STEP_MS, Effect::RetreatStep);
        tracing::debug!(team = ?self.team, health = self.health, "knight is retreating");
        true
    }

    /// One tick of the repeating retreat. The recovery check runs first; the
    /// step that observes recovery still carries the knight back one last time.
    pub fn retreat_step(&mut self, now: SimTime) -> RetreatProgress {
        if self.is_dead {
            self.is_retreating = false;
            return RetreatProgress::Abandoned;
        }

        let recovered = self.health > RECOVERED_HEALTH || self.stamina > RECOVERED_STAMINA;
        if recovered {
            self.is_retreating = false;
        } else {
            self.schedule.push(now + RETREAT_STEP_MS, Effect::RetreatStep);
        }

        self.position.x -= self.team.forward() * RETREAT_STEP;
        self.recover_stamina();

        if recovered {
            RetreatProgress::Recovered
        } else {
            RetreatProgress::Stepped
        }
    }

    /// Returns true only on the transition into death
    pub fn die(&mut self, now: SimTime) -> bool {
        if self.is_dead {
            return false;
        }

        self.is_dead = true;
        self.health = self.health.min(0.0);
        self.in_combat = false;
        self.is_charging = false;
        self.fallen = true;
        self.schedule.push(now + CORPSE_REMOVAL_MS, Effect::RemoveFromField);
        true
    }

    /// Apply a self-contained timed effect. Strikes and retreat steps need
    /// more context and are handled by the battle.
    pub fn expire(&mut self, effect: Effect) {
        match effect {
            Effect::LowerSword => self.sword_raised = false,
            Effect::LeaveCombat => self.in_combat = false,
            Effect::EndBlock => self.is_blocking = false,
            Effect::EndDodge => self.is_dodging = false,
            Effect::EndHitFlash => self.hit_flash = false,
            Effect::RemoveFromField => self.removed = true,
            Effect::DeliverStrike { .. } | Effect::RetreatStep => {}
        }
    }
}

/// Damage carried by one landed blow
pub fn roll_damage<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>() * DAMAGE_SPREAD + MIN_DAMAGE
}
