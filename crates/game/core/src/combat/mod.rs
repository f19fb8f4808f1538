//! Melee combat resolution.
//!
//! - [`damage`]: rolls and armor mitigation (pure)
//! - [`result`]: hit categories and the per-attack report
//! - [`text`]: message templates for each category
//!
//! [`resolve_attack`] applies one attack to the world and reports everything
//! that happened through the event bus.

pub mod damage;
pub mod result;
pub mod text;

pub use damage::{DamageType, apply_damage, mitigate, roll_damage};
pub use result::{AttackCategory, AttackReport, categorize};

use crate::ecs::{EntityId, Faction, Health, Melee, World};
use crate::events::{EventBus, GameEvent, colors};
use crate::rng::GameRng;

/// Resolves a melee attack from `attacker` against `target`.
///
/// Returns `None` (with no side effects) when the target is dead or has no
/// [`Health`]. Otherwise `TookDamage`, `Attack` and a `Message` are always
/// emitted, even for absorbed hits; a lethal hit additionally emits `Died` and
/// destroys the target.
pub fn resolve_attack(
    world: &mut World,
    events: &mut EventBus,
    rng: &mut GameRng,
    attacker: EntityId,
    target: EntityId,
) -> Option<AttackReport> {
    let armor = world.get::<Health>(target)?.armor;

    let melee = world.get::<Melee>(attacker).copied();
    let roll = roll_damage(melee.as_ref(), rng);
    let max_roll = melee.map_or(1, |m| m.damage_max);
    let damage_type = melee.map_or(DamageType::Physical, |m| m.damage_type);
    let damage = mitigate(roll, armor);

    let health = world.get_mut::<Health>(target)?;
    let hp_before = health.hp;
    health.hp = apply_damage(health.hp, damage);
    let hp_after = health.hp;
    let killed = damage > 0 && hp_after == 0;

    let category = categorize(damage, max_roll, killed);
    let report = AttackReport {
        attacker,
        target,
        roll,
        damage,
        hp_before,
        hp_after,
        category,
        killed,
    };

    tracing::debug!(
        %attacker,
        %target,
        roll,
        damage,
        hp_after,
        ?category,
        "attack resolved"
    );

    let attacker_name = world.name_or(attacker, "Something").to_owned();
    let target_name = world.name_or(target, "something").to_owned();
    let player_attacking = world.get::<Faction>(attacker) == Some(&Faction::Player);
    let player_defending = world.get::<Faction>(target) == Some(&Faction::Player);

    events.push(GameEvent::TookDamage {
        who: target,
        amount: damage,
        damage_type,
    });
    events.push(GameEvent::Attack { attacker, target });

    let (template_text, color) = if player_attacking {
        (text::player_attack(category, rng), colors::WHITE)
    } else if player_defending {
        (text::enemy_attack(category, rng), colors::RED)
    } else {
        (text::bystander_attack(category), colors::GREY)
    };
    let message = text::format(template_text, &attacker_name, &target_name, damage);
    let message = match (player_attacking, player_defending) {
        (true, _) => text::format_enemy(&message, &target_name),
        (_, true) => text::format_enemy(&message, &attacker_name),
        _ => message,
    };
    events.push(GameEvent::message(message, color));

    if killed {
        events.push(GameEvent::Died {
            who: target,
            killer: Some(attacker),
            killer_name: Some(attacker_name),
        });
        world.destroy(target);
    }

    Some(report)
}

/// Boolean form of [`resolve_attack`]: `false` when the target cannot be attacked.
pub fn attack(
    world: &mut World,
    events: &mut EventBus,
    rng: &mut GameRng,
    attacker: EntityId,
    target: EntityId,
) -> bool {
    resolve_attack(world, events, rng, attacker, target).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Name, Position};
    use crate::events::EventKind;

    fn fighter(world: &mut World, name: &str, melee: Option<Melee>, health: Health) -> EntityId {
        let id = world.create();
        world.add(id, Position::new(0, 0)).unwrap();
        world.add(id, Name::new(name)).unwrap();
        world.add(id, health).unwrap();
        if let Some(melee) = melee {
            world.add(id, melee).unwrap();
        }
        id
    }

    #[test]
    fn repeated_attacks_kill_exactly_once() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let mut rng = GameRng::new(11);
        let attacker = fighter(&mut world, "Hero", Some(Melee::physical(2, 4)), Health::new(10, 0));
        let target = fighter(&mut world, "Rat", None, Health::new(3, 0));

        let mut dealt = 0;
        while world.is_alive(target) {
            let report = resolve_attack(&mut world, &mut events, &mut rng, attacker, target)
                .expect("target still has health");
            dealt += report.damage;
        }

        let log = events.drain();
        let deaths = log.iter().filter(|e| e.kind() == EventKind::Died).count();
        assert_eq!(deaths, 1);
        assert!(dealt >= 3);
        assert!(!attack(&mut world, &mut events, &mut rng, attacker, target));
    }

    #[test]
    fn full_armor_absorbs_and_still_reports() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let mut rng = GameRng::new(5);
        let attacker = fighter(&mut world, "Rat", Some(Melee::physical(1, 2)), Health::new(3, 0));
        let target = fighter(&mut world, "Knight", None, Health::new(10, 5));

        let report = resolve_attack(&mut world, &mut events, &mut rng, attacker, target).unwrap();
        assert_eq!(report.damage, 0);
        assert_eq!(report.category, AttackCategory::Absorbed);
        assert_eq!(world.get::<Health>(target).unwrap().hp, 10);

        let log = events.drain();
        assert!(log.contains(&GameEvent::TookDamage {
            who: target,
            amount: 0,
            damage_type: DamageType::Physical,
        }));
        assert!(log.iter().any(|e| e.kind() == EventKind::Attack));
        assert!(log.iter().all(|e| e.kind() != EventKind::Died));
    }

    #[test]
    fn unarmed_attack_deals_one() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let mut rng = GameRng::new(1);
        let attacker = fighter(&mut world, "Ghost", None, Health::new(1, 0));
        let target = fighter(&mut world, "Rat", None, Health::new(3, 0));

        let report = resolve_attack(&mut world, &mut events, &mut rng, attacker, target).unwrap();
        assert_eq!(report.roll, 1);
        assert_eq!(world.get::<Health>(target).unwrap().hp, 2);
    }

    #[test]
    fn target_without_health_is_rejected() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let mut rng = GameRng::new(1);
        let attacker = fighter(&mut world, "Hero", None, Health::new(1, 0));
        let wall = world.create();

        assert!(!attack(&mut world, &mut events, &mut rng, attacker, wall));
        assert!(events.is_empty());
    }

    #[test]
    fn died_event_names_the_killer() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let mut rng = GameRng::new(2);
        let attacker = fighter(&mut world, "Rat", Some(Melee::physical(5, 5)), Health::new(3, 0));
        let target = fighter(&mut world, "Hero", None, Health::new(5, 0));

        resolve_attack(&mut world, &mut events, &mut rng, attacker, target).unwrap();
        assert!(events.drain().contains(&GameEvent::Died {
            who: target,
            killer: Some(attacker),
            killer_name: Some("Rat".into()),
        }));
        assert!(!world.is_alive(target));
    }
}
