//! Per-brain decision policies.

use crate::config::GameConfig;
use crate::ecs::{EntityId, Health, Position};
use crate::intent::Intent;
use crate::movement::CardinalDirection;
use crate::rng::GameRng;

use super::AiContext;
use super::pathfind::find_path;

/// Idle half the time, otherwise a random open orthogonal step.
pub fn wander(ctx: &AiContext<'_>, rng: &mut GameRng, position: Position) -> Intent {
    if rng.chance(0.5) {
        return Intent::Wait;
    }

    let open: Vec<CardinalDirection> = CardinalDirection::ALL
        .into_iter()
        .filter(|direction| {
            let (dx, dy) = direction.delta();
            ctx.can_move_to(position.offset(dx, dy))
        })
        .collect();
    rng.choose(&open)
        .map_or(Intent::Wait, |direction| Intent::step(*direction))
}

/// Chase and attack the player inside `aggro_range`.
///
/// With `flee_range` set, an entity under the flee threshold retreats instead;
/// bosses pass `None` and never retreat.
pub fn hunt(
    ctx: &AiContext<'_>,
    rng: &mut GameRng,
    entity: EntityId,
    position: Position,
    aggro_range: u32,
    flee_range: Option<u32>,
) -> Intent {
    if let Some(flee_range) = flee_range
        && is_badly_hurt(ctx, entity)
    {
        return flee(ctx, rng, position, flee_range);
    }

    let (Some(player), Some(target)) = (ctx.player, ctx.player_position()) else {
        return wander(ctx, rng, position);
    };

    let distance = position.manhattan(target);
    if distance > aggro_range {
        return wander(ctx, rng, position);
    }
    if distance == 1 {
        return Intent::Attack { target: player };
    }

    let path = find_path(ctx.dimensions, position, target, |cell| ctx.can_move_to(cell));
    match path.as_deref() {
        Some([_, next, ..]) if *next != target => Intent::Move {
            dx: next.x - position.x,
            dy: next.y - position.y,
        },
        _ => Intent::Wait,
    }
}

/// Step away from the player inside `flee_range`, else wander.
///
/// Candidates in order: horizontal away, vertical away, diagonal away.
pub fn flee(ctx: &AiContext<'_>, rng: &mut GameRng, position: Position, flee_range: u32) -> Intent {
    let Some(threat) = ctx.player_position() else {
        return wander(ctx, rng, position);
    };
    if position.manhattan(threat) > flee_range {
        return wander(ctx, rng, position);
    }

    let dx = (position.x - threat.x).signum();
    let dy = (position.y - threat.y).signum();
    let candidates = [
        (dx != 0).then_some((dx, 0)),
        (dy != 0).then_some((0, dy)),
        (dx != 0 && dy != 0).then_some((dx, dy)),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|(dx, dy)| ctx.can_move_to(position.offset(*dx, *dy)))
        .map_or_else(
            || wander(ctx, rng, position),
            |(dx, dy)| Intent::Move { dx, dy },
        )
}

fn is_badly_hurt(ctx: &AiContext<'_>, entity: EntityId) -> bool {
    ctx.world
        .get::<Health>(entity)
        .is_some_and(|health| health.hp * 100 < health.max * GameConfig::FLEE_HEALTH_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::decide;
    use crate::ecs::{Actor, Blocks, Brain, Faction, MapDimensions, World};

    const DIMS: MapDimensions = MapDimensions::new(20, 20);

    fn player(world: &mut World, at: Position) -> EntityId {
        let id = world.create();
        world.add(id, at).unwrap();
        world.add(id, Faction::Player).unwrap();
        world.add(id, Blocks).unwrap();
        world.add(id, Health::new(20, 0)).unwrap();
        id
    }

    fn mob(world: &mut World, at: Position, brain: Brain, hp: u32) -> EntityId {
        let id = world.create();
        world.add(id, at).unwrap();
        world.add(id, Faction::Mob).unwrap();
        world.add(id, Blocks).unwrap();
        world.add(id, brain).unwrap();
        world.add(id, Actor { energy: 100, speed: 100 }).unwrap();
        world.add(id, Health { hp, max: 10, armor: 0 }).unwrap();
        id
    }

    #[test]
    fn hunter_out_of_range_only_wanders() {
        let mut world = World::new();
        player(&mut world, Position::new(0, 0));
        let rat = mob(&mut world, Position::new(5, 5), Brain::hunt(6), 10);
        let ctx = AiContext::new(&world, DIMS);

        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            match decide(&ctx, &mut rng, rat) {
                Intent::Wait => {}
                Intent::Move { dx, dy } => assert_eq!(dx.abs() + dy.abs(), 1),
                other => panic!("unexpected intent {other:?}"),
            }
        }
    }

    #[test]
    fn adjacent_hunter_attacks() {
        let mut world = World::new();
        let hero = player(&mut world, Position::new(4, 4));
        let rat = mob(&mut world, Position::new(4, 5), Brain::hunt(6), 10);
        let ctx = AiContext::new(&world, DIMS);

        let intent = decide(&ctx, &mut GameRng::new(1), rat);
        assert_eq!(intent, Intent::Attack { target: hero });
    }

    #[test]
    fn hunter_closes_distance() {
        let mut world = World::new();
        player(&mut world, Position::new(2, 2));
        let rat = mob(&mut world, Position::new(2, 6), Brain::hunt(6), 10);
        let ctx = AiContext::new(&world, DIMS);

        let intent = decide(&ctx, &mut GameRng::new(1), rat);
        assert_eq!(intent, Intent::Move { dx: 0, dy: -1 });
    }

    #[test]
    fn wounded_hunter_runs_but_boss_does_not() {
        let mut world = World::new();
        let hero = player(&mut world, Position::new(5, 5));
        let rat = mob(&mut world, Position::new(7, 5), Brain::hunt(6), 2);
        let boss = mob(&mut world, Position::new(5, 6), Brain::Boss { aggro_range: 8 }, 1);
        let ctx = AiContext::new(&world, DIMS);

        assert_eq!(decide(&ctx, &mut GameRng::new(1), rat), Intent::Move { dx: 1, dy: 0 });
        assert_eq!(
            decide(&ctx, &mut GameRng::new(1), boss),
            Intent::Attack { target: hero }
        );
    }

    #[test]
    fn cornered_fleer_tries_vertical_then_diagonal() {
        let mut world = World::new();
        player(&mut world, Position::new(3, 3));
        let coward = mob(&mut world, Position::new(4, 4), Brain::Flee { flee_range: 4 }, 10);
        let wall = world.create();
        world.add(wall, Position::new(5, 4)).unwrap();
        world.add(wall, Blocks).unwrap();
        let ctx = AiContext::new(&world, DIMS);

        assert_eq!(
            flee(&ctx, &mut GameRng::new(1), Position::new(4, 4), 4),
            Intent::Move { dx: 0, dy: 1 }
        );
        assert_eq!(world.position(coward), Some(Position::new(4, 4)));
    }

    #[test]
    fn brainless_or_unready_entities_wait() {
        let mut world = World::new();
        player(&mut world, Position::new(0, 0));
        let rock = world.create();
        world.add(rock, Position::new(1, 0)).unwrap();
        let tired = mob(&mut world, Position::new(0, 1), Brain::hunt(6), 10);
        world.get_mut::<Actor>(tired).unwrap().energy = 40;
        let ctx = AiContext::new(&world, DIMS);

        assert_eq!(decide(&ctx, &mut GameRng::new(1), rock), Intent::Wait);
        assert_eq!(decide(&ctx, &mut GameRng::new(1), tired), Intent::Wait);
    }
}
