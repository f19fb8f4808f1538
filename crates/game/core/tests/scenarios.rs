use game_core::ecs::{ComponentSet, Tile};
use game_core::{
    AiContext, Blocks, Brain, DiggerConfig, EventBus, Faction, GameEvent, GameRng, Health, Intent,
    Item, ItemEffect, ItemKind, ItemSpawnConfig, MapDimensions, Melee, Position, World, attack,
    decide, map, use_item,
};

#[test]
fn seed_42_dungeon_connects_start_and_stairs() {
    let mut rng = GameRng::new(42);
    let dungeon = map::generate(80, 45, &DiggerConfig::default(), &ItemSpawnConfig::default(), &mut rng);

    assert_ne!(dungeon.player_start, dungeon.stairs_down);
    assert!(dungeon.is_walkable(dungeon.player_start));
    assert!(dungeon.is_walkable(dungeon.stairs_down));
    assert!(dungeon.is_reachable(dungeon.player_start, dungeon.stairs_down));

    let mut world = World::new();
    map::populate(&mut world, &dungeon).unwrap();
    assert_eq!(world.query(ComponentSet::TILE).len(), 80 * 45);
    let stairs_tile = world.find_at::<Tile>(dungeon.stairs_down).unwrap();
    assert!(!world.has::<Blocks>(stairs_tile));
}

#[test]
fn repeated_attacks_kill_exactly_once() {
    let mut world = World::new();
    let mut events = EventBus::new();
    let mut rng = GameRng::new(99);

    let attacker = world.create();
    world.add(attacker, Melee::physical(2, 4)).unwrap();
    let target = world.create();
    world.add(target, Health { hp: 3, max: 3, armor: 0 }).unwrap();

    let mut total = 0;
    while attack(&mut world, &mut events, &mut rng, attacker, target) {
        if let Some(GameEvent::TookDamage { amount, .. }) = events
            .pending()
            .iter()
            .rev()
            .find(|event| matches!(event, GameEvent::TookDamage { .. }))
        {
            total += amount;
        }
        if !world.is_alive(target) {
            break;
        }
    }

    let deaths = events
        .drain()
        .into_iter()
        .filter(|event| matches!(event, GameEvent::Died { .. }))
        .count();
    assert_eq!(deaths, 1);
    assert!(total >= 3);
    assert!(!world.is_alive(target));
    assert!(!attack(&mut world, &mut events, &mut rng, attacker, target));
}

#[test]
fn health_potion_heals_up_to_max_and_is_consumed() {
    let mut world = World::new();
    let mut events = EventBus::new();

    let user = world.create();
    world.add(user, Health { hp: 15, max: 20, armor: 0 }).unwrap();
    let potion = world.create();
    world
        .add(
            potion,
            Item {
                kind: ItemKind::HealthPotion,
                effect: ItemEffect::Heal { amount: 10 },
            },
        )
        .unwrap();

    assert!(use_item(&mut world, &mut events, potion, user));
    assert_eq!(world.get::<Health>(user).unwrap().hp, 20);
    assert!(!world.is_alive(potion));

    let healed: Vec<GameEvent> = events
        .drain()
        .into_iter()
        .filter(|event| matches!(event, GameEvent::Healed { .. }))
        .collect();
    assert_eq!(healed, vec![GameEvent::Healed { who: user, amount: 5 }]);
}

#[test]
fn distant_hunter_never_attacks() {
    let mut world = World::new();
    let player = world.create();
    world.add(player, Position::new(2, 2)).unwrap();
    world.add(player, Faction::Player).unwrap();
    world.add(player, Health::new(20, 0)).unwrap();

    let hunter = world.create();
    world.add(hunter, Position::new(8, 6)).unwrap();
    world.add(hunter, Faction::Mob).unwrap();
    world.add(hunter, Health::new(5, 0)).unwrap();
    world.add(hunter, Brain::hunt(6)).unwrap();
    world.add(hunter, game_core::Actor { energy: 100, speed: 100 }).unwrap();

    let ctx = AiContext::new(&world, MapDimensions::new(20, 20));
    for seed in 0..100 {
        let intent = decide(&ctx, &mut GameRng::new(seed), hunter);
        match intent {
            Intent::Wait => {}
            Intent::Move { dx, dy } => assert_eq!(dx.abs() + dy.abs(), 1),
            other => panic!("hunter out of range produced {other:?}"),
        }
    }
}
