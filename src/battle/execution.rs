//! Battle execution loop
//!
//! Each tick: timers -> movement -> charge -> combat -> outcome

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::engagement::{select_target, TargetChoice, TargetSource};
use crate::battle::formation_layout::deploy_roster;
use crate::battle::knight::{roll_damage, DefenseOutcome, Knight, Posture, RetreatProgress};
use crate::battle::movement::{advance_roster, should_charge, sound_charge};
use crate::battle::roster::{Roster, Team, UnitRef};
use crate::battle::schedule::{Effect, ScheduledEffect};
use crate::core::config::BattleConfig;
use crate::core::error::Result;
use crate::core::types::{SimTime, Tick, Vec2};

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Deployment,
    Active,
    Finished,
}

/// Battle outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleOutcome {
    #[default]
    Undecided,
    Victory(Team),
    MutualDestruction,
}

/// Log entry for battle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub tick: Tick,
    pub time_ms: SimTime,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted,
    ChargeSounded,
    Engaged {
        attacker: UnitRef,
        target: UnitRef,
        joined_fight: bool,
    },
    Blocked { attacker: UnitRef, defender: UnitRef },
    Dodged { attacker: UnitRef, defender: UnitRef },
    Struck {
        attacker: UnitRef,
        defender: UnitRef,
        amount: f32,
    },
    Killed { unit: UnitRef },
    Retreating { unit: UnitRef },
    Recovered { unit: UnitRef },
    BattleEnded { outcome: BattleOutcome },
}

/// What a renderer needs to draw one knight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnightView {
    pub unit: UnitRef,
    pub position: Vec2,
    pub health: f32,
    pub stamina: f32,
    pub posture: Posture,
    pub is_charging: bool,
    pub in_combat: bool,
    pub sword_raised: bool,
    pub hit_flash: bool,
    pub fallen: bool,
    pub removed: bool,
}

impl KnightView {
    fn new(unit: UnitRef, knight: &Knight) -> Self {
        Self {
            unit,
            position: knight.position,
            health: knight.health,
            stamina: knight.stamina,
            posture: knight.posture(),
            is_charging: knight.is_charging,
            in_combat: knight.in_combat,
            sword_raised: knight.sword_raised,
            hit_flash: knight.hit_flash,
            fallen: knight.fallen,
            removed: knight.removed,
        }
    }
}

/// Complete battle state
#[derive(Debug, Clone)]
pub struct BattleState {
    pub team_a: Roster,
    pub team_b: Roster,

    // Time
    pub tick: Tick,
    pub now: SimTime,
    pub frame_ms: u64,
    pub phase: BattlePhase,
    pub outcome: BattleOutcome,

    pub charge_sounded: bool,
    pub seed: u64,
    rng: ChaCha8Rng,

    // Log
    pub battle_log: Vec<BattleEvent>,
}

impl BattleState {
    pub fn new(team_a: Roster, team_b: Roster, frame_ms: u64, seed: u64) -> Self {
        Self::with_rng(team_a, team_b, frame_ms, seed, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(team_a: Roster, team_b: Roster, frame_ms: u64, seed: u64, rng: ChaCha8Rng) -> Self {
        Self {
            team_a,
            team_b,
            tick: 0,
            now: 0,
            frame_ms,
            phase: BattlePhase::Deployment,
            outcome: BattleOutcome::Undecided,
            charge_sounded: false,
            seed,
            rng,
            battle_log: Vec::new(),
        }
    }

    /// Deploy both sides from a config
    pub fn from_config(config: &BattleConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let team_a = deploy_roster(Team::A, config, &mut rng);
        let team_b = deploy_roster(Team::B, config, &mut rng);

        Ok(Self::with_rng(team_a, team_b, config.frame_ms, seed, rng))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, BattlePhase::Finished)
    }

    pub fn start_battle(&mut self) {
        self.phase = BattlePhase::Active;
        tracing::info!(
            team_a = self.team_a.len(),
            team_b = self.team_b.len(),
            "battle started"
        );
        self.log_event(BattleEventType::BattleStarted, "Battle has begun!".into());
    }

    pub fn end_battle(&mut self, outcome: BattleOutcome) {
        self.phase = BattlePhase::Finished;
        self.outcome = outcome;
        tracing::info!(tick = self.tick, ?outcome, "battle ended");
        self.log_event(
            BattleEventType::BattleEnded { outcome },
            format!("Battle ended: {:?}", outcome),
        );
    }

    pub fn log_event(&mut self, event_type: BattleEventType, description: String) {
        self.log_event_at(self.now, event_type, description);
    }

    /// Log an event raised by a timed effect, stamped with its due time
    pub fn log_event_at(&mut self, time_ms: SimTime, event_type: BattleEventType, description: String) {
        self.battle_log.push(BattleEvent {
            tick: self.tick,
            time_ms,
            event_type,
            description,
        });
    }

    pub fn roster(&self, team: Team) -> &Roster {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }

    pub fn roster_mut(&mut self, team: Team) -> &mut Roster {
        match team {
            Team::A => &mut self.team_a,
            Team::B => &mut self.team_b,
        }
    }

    pub fn knight(&self, unit: UnitRef) -> Option<&Knight> {
        self.roster(unit.team).get(unit.slot)
    }

    pub fn knight_mut(&mut self, unit: UnitRef) -> Option<&mut Knight> {
        self.roster_mut(unit.team).get_mut(unit.slot)
    }

    /// Run one frame. All effects land on the rosters and the battle log.
    pub fn run_tick(&mut self) {
        if self.is_finished() {
            return;
        }
        if self.phase == BattlePhase::Deployment {
            self.start_battle();
        }

        self.tick += 1;
        self.advance_clock(self.frame_ms);

        advance_roster(&mut self.team_a);
        advance_roster(&mut self.team_b);

        self.phase_charge();
        self.resolve_engagements();

        if let Some(outcome) = check_battle_end(self) {
            self.end_battle(outcome);
        }
    }

    /// Move the clock forward and fire every timed effect that falls due,
    /// each at its own due time
    pub fn advance_clock(&mut self, ms: u64) {
        self.now += ms;
        while let Some(unit) = self.next_due_unit() {
            let now = self.now;
            let Some(entry) = self.knight_mut(unit).and_then(|k| k.schedule.pop_due(now)) else {
                break;
            };
            self.apply_effect(unit, entry);
        }
    }

    /// Knight holding the globally earliest due effect.
    /// Ties: team A before B, lower slot first, then scheduling order.
    fn next_due_unit(&self) -> Option<UnitRef> {
        let now = self.now;
        [&self.team_a, &self.team_b]
            .into_iter()
            .flat_map(|roster| {
                roster
                    .knights
                    .iter()
                    .enumerate()
                    .map(move |(slot, k)| (UnitRef::new(roster.team, slot), k))
            })
            .filter_map(|(unit, k)| {
                k.schedule
                    .peek()
                    .filter(|e| e.due <= now)
                    .map(|e| ((e.due, unit, e.seq), unit))
            })
            .min_by_key(|(key, _)| *key)
            .map(|(_, unit)| unit)
    }

    fn apply_effect(&mut self, unit: UnitRef, entry: ScheduledEffect) {
        let at = entry.due;
        match entry.effect {
            Effect::DeliverStrike { target } => self.deliver_strike(unit, target, at),
            Effect::RetreatStep => {
                let progress = self.knight_mut(unit).map(|k| k.retreat_step(at));
                if progress == Some(RetreatProgress::Recovered) {
                    self.log_event_at(
                        at,
                        BattleEventType::Recovered { unit },
                        format!("{:?} knight {} rejoins the fight", unit.team, unit.slot),
                    );
                }
            }
            other => {
                if let Some(knight) = self.knight_mut(unit) {
                    knight.expire(other);
                }
            }
        }
    }

    /// A swing lands: damage is rolled now, the target defends, and the
    /// attacker is free to swing again. Fires even if the attacker has died.
    fn deliver_strike(&mut self, attacker: UnitRef, defender: UnitRef, at: SimTime) {
        let amount = roll_damage(&mut self.rng);

        let rng = &mut self.rng;
        let target = match defender.team {
            Team::A => self.team_a.get_mut(defender.slot),
            Team::B => self.team_b.get_mut(defender.slot),
        };
        let outcome = target.map(|target| target.defend_or_take_damage(amount, at, rng));

        if let Some(knight) = self.knight_mut(attacker) {
            knight.finish_strike();
        }

        match outcome {
            Some(DefenseOutcome::Blocked) => self.log_event_at(
                at,
                BattleEventType::Blocked { attacker, defender },
                format!("{:?} knight {} blocks", defender.team, defender.slot),
            ),
            Some(DefenseOutcome::Dodged) => self.log_event_at(
                at,
                BattleEventType::Dodged { attacker, defender },
                format!("{:?} knight {} dodges", defender.team, defender.slot),
            ),
            Some(DefenseOutcome::Struck(damage)) => {
                self.log_event_at(
                    at,
                    BattleEventType::Struck {
                        attacker,
                        defender,
                        amount: damage.amount,
                    },
                    format!(
                        "{:?} knight {} takes {:.1} damage",
                        defender.team, defender.slot, damage.amount
                    ),
                );
                if damage.killed {
                    self.log_event_at(
                        at,
                        BattleEventType::Killed { unit: defender },
                        format!("{:?} knight {} falls", defender.team, defender.slot),
                    );
                }
                if damage.began_retreat {
                    self.log_event_at(
                        at,
                        BattleEventType::Retreating { unit: defender },
                        format!("{:?} knight {} is retreating", defender.team, defender.slot),
                    );
                }
            }
            Some(DefenseOutcome::Ignored) | None => {}
        }
    }

    fn phase_charge(&mut self) {
        if !should_charge(&self.team_a, &self.team_b) {
            return;
        }

        let started = sound_charge(&mut self.team_a) + sound_charge(&mut self.team_b);
        if started > 0 && !self.charge_sounded {
            self.charge_sounded = true;
            self.log_event(
                BattleEventType::ChargeSounded,
                format!("Frontlines close, {} knights charge", started),
            );
        }
    }

    /// Combat-resolution pass: team A then team B, every knight that is alive
    /// and not already fighting picks a target and swings. Knights that engage
    /// early in the pass are visible as fighting to those after them.
    pub fn resolve_engagements(&mut self) {
        for team in [Team::A, Team::B] {
            for slot in 0..self.roster(team).len() {
                let attacker = UnitRef::new(team, slot);
                let Some(choice) = self.pick_target(attacker) else {
                    continue;
                };

                let target = UnitRef::new(team.opponent(), choice.slot);
                let now = self.now;
                let engaged = self
                    .knight_mut(attacker)
                    .is_some_and(|k| k.attack(target, now));

                if engaged {
                    let joined_fight = choice.source == TargetSource::NearbyBattle;
                    self.log_event(
                        BattleEventType::Engaged {
                            attacker,
                            target,
                            joined_fight,
                        },
                        format!(
                            "{:?} knight {} attacks {:?} knight {}",
                            team, slot, target.team, target.slot
                        ),
                    );
                }
            }
        }
    }

    fn pick_target(&self, unit: UnitRef) -> Option<TargetChoice> {
        let knight = self.knight(unit)?;
        if !knight.is_ready_to_engage() {
            return None;
        }

        let allies = &self.roster(unit.team).knights;
        let enemies = &self.roster(unit.team.opponent()).knights;
        select_target(knight, allies, enemies)
    }

    /// Per-knight state for the presentation layer
    pub fn snapshot(&self) -> Vec<KnightView> {
        [&self.team_a, &self.team_b]
            .into_iter()
            .flat_map(|roster| {
                roster
                    .knights
                    .iter()
                    .enumerate()
                    .map(move |(slot, k)| KnightView::new(UnitRef::new(roster.team, slot), k))
            })
            .collect()
    }

    /// Dead knights of `team`
    pub fn casualties(&self, team: Team) -> usize {
        let roster = self.roster(team);
        roster.len() - roster.living_count()
    }
}

/// Check whether one side has been wiped out. Sides that never fielded a
/// knight don't count as destroyed.
pub fn check_battle_end(state: &BattleState) -> Option<BattleOutcome> {
    let a_destroyed = !state.team_a.is_empty() && state.team_a.all_dead();
    let b_destroyed = !state.team_b.is_empty() && state.team_b.all_dead();

    match (a_destroyed, b_destroyed) {
        (true, true) => Some(BattleOutcome::MutualDestruction),
        (false, true) => Some(BattleOutcome::Victory(Team::A)),
        (true, false) => Some(BattleOutcome::Victory(Team::B)),
        (false, false) => None,
    }
}
