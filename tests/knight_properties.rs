//! Property tests for knight state and target selection

use kotf::battle::*;
use kotf::core::types::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
struct EnemySpec {
    x: f32,
    y: f32,
    dead: bool,
    retreating: bool,
    in_combat: bool,
}

fn enemy_spec() -> impl Strategy<Value = EnemySpec> {
    (-6.0f32..6.0, -6.0f32..6.0, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(x, y, dead, retreating, in_combat)| EnemySpec {
            x,
            y,
            dead,
            retreating,
            in_combat,
        },
    )
}

fn field(specs: &[EnemySpec]) -> Vec<Knight> {
    specs
        .iter()
        .map(|s| {
            let mut k = Knight::new(Team::B, Vec2::new(s.x, s.y), 0.0);
            if s.dead {
                k.die(0);
            }
            k.is_retreating = s.retreating;
            k.in_combat = s.in_combat && !s.dead;
            k
        })
        .collect()
}

fn effective_distance(from: &Knight, enemy: &Knight) -> f32 {
    let d = from.position.distance(&enemy.position);
    if enemy.in_combat {
        d * IN_COMBAT_DISCOUNT
    } else {
        d
    }
}

proptest! {
    #[test]
    fn dead_knights_have_no_health(blows in prop::collection::vec(0.0f32..40.0, 1..12)) {
        let mut knight = Knight::new(Team::A, Vec2::default(), 0.0);
        for (i, blow) in blows.iter().enumerate() {
            knight.take_damage(*blow, i as u64 * 100);
            if knight.is_dead {
                prop_assert!(knight.health <= 0.0);
                prop_assert!(!knight.in_combat);
            }
        }
    }

    #[test]
    fn die_twice_changes_nothing(health in -20.0f32..100.0, later in 0u64..5_000) {
        let mut knight = Knight::new(Team::A, Vec2::default(), 0.0);
        knight.health = health;
        knight.die(0);
        let health_after = knight.health;
        let pending = knight.schedule.len();

        prop_assert!(!knight.die(later));
        prop_assert_eq!(knight.health, health_after);
        prop_assert_eq!(knight.schedule.len(), pending);
    }

    #[test]
    fn nearest_enemy_is_eligible_and_in_reach(specs in prop::collection::vec(enemy_spec(), 0..10)) {
        let me = Knight::new(Team::A, Vec2::default(), 0.0);
        let enemies = field(&specs);

        match find_nearest_enemy(&me, &enemies) {
            Some(slot) => {
                let chosen = &enemies[slot];
                prop_assert!(chosen.is_alive());
                prop_assert!(!chosen.is_retreating);
                let best = effective_distance(&me, chosen);
                prop_assert!(best < ENGAGEMENT_RADIUS);
                for enemy in enemies.iter().filter(|e| e.is_alive() && !e.is_retreating) {
                    prop_assert!(best <= effective_distance(&me, enemy));
                }
            }
            None => {
                for enemy in enemies.iter().filter(|e| e.is_alive() && !e.is_retreating) {
                    prop_assert!(effective_distance(&me, enemy) >= ENGAGEMENT_RADIUS);
                }
            }
        }
    }

    #[test]
    fn fighting_enemy_in_reach_stays_in_reach(x in -2.99f32..2.99) {
        let me = Knight::new(Team::A, Vec2::default(), 0.0);
        let mut enemy = Knight::new(Team::B, Vec2::new(x, 0.0), 0.0);
        enemy.in_combat = true;
        prop_assert_eq!(find_nearest_enemy(&me, &[enemy]), Some(0));
    }

    #[test]
    fn nearby_battle_never_picks_the_dead(
        specs in prop::collection::vec(enemy_spec(), 0..10),
        ally_fighting in any::<bool>(),
    ) {
        let me = Knight::new(Team::A, Vec2::default(), 0.0);
        let mut ally = Knight::new(Team::A, Vec2::new(1.0, 0.0), 0.0);
        ally.in_combat = ally_fighting;
        let enemies = field(&specs);

        let found = find_nearby_battle(&me, &[me.clone(), ally], &enemies);
        if !ally_fighting {
            prop_assert_eq!(found, None);
        }
        if let Some(slot) = found {
            prop_assert!(enemies[slot].is_alive());
            prop_assert!(me.position.distance(&enemies[slot].position) < ENGAGEMENT_RADIUS);
        }
    }

    #[test]
    fn each_blow_resolves_exactly_once(
        seed in any::<u64>(),
        stamina in 0.0f32..100.0,
        amount in 5.0f32..25.0,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut knight = Knight::new(Team::B, Vec2::default(), 0.0);
        knight.stamina = stamina;

        let outcome = knight.defend_or_take_damage(amount, 0, &mut rng);
        match outcome {
            DefenseOutcome::Blocked => {
                prop_assert!(knight.is_blocking && !knight.is_dodging);
                prop_assert_eq!(knight.health, MAX_HEALTH);
            }
            DefenseOutcome::Dodged => {
                prop_assert!(knight.is_dodging && !knight.is_blocking);
                prop_assert_eq!(knight.health, MAX_HEALTH);
            }
            DefenseOutcome::Struck(damage) => {
                prop_assert!(!knight.is_blocking && !knight.is_dodging);
                prop_assert_eq!(damage.amount, amount);
                prop_assert_eq!(knight.health, MAX_HEALTH - amount);
            }
            DefenseOutcome::Ignored => prop_assert!(false, "living knight ignored a blow"),
        }
    }

    #[test]
    fn surviving_a_heavy_hit_means_retreat(health in 1.0f32..100.0, amount in 0.0f32..60.0) {
        let mut knight = Knight::new(Team::A, Vec2::default(), 0.0);
        knight.health = health;
        let outcome = knight.take_damage(amount, 0);

        if knight.is_alive() && knight.health < RETREAT_HEALTH {
            prop_assert!(knight.is_retreating);
            prop_assert!(outcome.began_retreat);
        }
        if knight.is_dead {
            prop_assert!(!outcome.began_retreat);
        }
    }

    #[test]
    fn rolled_damage_stays_in_band(seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let damage = roll_damage(&mut rng);
        prop_assert!(damage >= MIN_DAMAGE);
        prop_assert!(damage <= MIN_DAMAGE + DAMAGE_SPREAD);
    }
}
