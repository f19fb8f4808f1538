//! Level construction: terrain, player placement and spawning.

use tracing::{debug, warn};

use crate::config::{GameConfig, PlayerConfig};
use crate::ecs::{
    Actor, Blocks, Brain, EntityId, Faction, Health, Inventory, ItemKind, Light, MapDimensions,
    Melee, Name, Position, RenderGlyph, StoreError, World,
};
use crate::events::colors;
use crate::inventory::spawn_item;
use crate::map::Dungeon;
use crate::movement::can_move_to;
use crate::rng::GameRng;

/// Heading shown when a floor is entered.
pub fn floor_description(floor: u32, final_floor: u32) -> &'static str {
    match floor {
        1 => "The entrance",
        f if f == final_floor => "The final floor!",
        2..=3 => "Upper levels",
        4..=6 => "The depths",
        7..=9 => "Deep caverns",
        _ => "Unknown depths",
    }
}

/// Creates the player with its torch. The Position is set by [`place_player`].
pub fn spawn_player(world: &mut World, config: &PlayerConfig) -> Result<EntityId, StoreError> {
    let id = world.create();
    world.add(id, Position::ORIGIN)?;
    world.add(id, RenderGlyph::new('@', colors::YELLOW, 10))?;
    world.add(id, Blocks)?;
    world.add(id, Faction::Player)?;
    world.add(id, Name::new("Player"))?;
    world.add(id, Actor::new(config.speed))?;
    world.add(id, Health::new(config.hp, config.armor))?;
    world.add(id, Melee::physical(config.damage_min, config.damage_max))?;
    world.add(id, Inventory::empty())?;
    world.add(
        id,
        Light {
            radius: config.torch_radius,
            intensity: config.torch_intensity,
            color: config.torch_color,
        },
    )?;
    Ok(id)
}

/// Destroys everything except the player and what the player carries.
pub fn clear_level(world: &mut World, player: EntityId) -> usize {
    let carried: Vec<EntityId> = world
        .get::<Inventory>(player)
        .map(|inventory| inventory.slots.to_vec())
        .unwrap_or_default();
    let doomed: Vec<EntityId> = world
        .entities()
        .filter(|id| *id != player && !carried.contains(id))
        .collect();
    for id in &doomed {
        world.destroy(*id);
    }
    doomed.len()
}

/// Moves the player to the start cell with an empty energy pool.
pub fn place_player(world: &mut World, player: EntityId, start: Position) -> Result<(), StoreError> {
    world.relocate(player, start)?;
    world.try_get_mut::<Actor>(player)?.energy = 0;
    Ok(())
}

/// Up to [`GameConfig::SPAWN_ATTEMPTS`] uniform samples for an enterable cell.
pub fn random_open_cell(world: &World, dimensions: MapDimensions, rng: &mut GameRng) -> Option<Position> {
    (0..GameConfig::SPAWN_ATTEMPTS).find_map(|_| {
        let x = rng.range(0, dimensions.width - 1) as i32;
        let y = rng.range(0, dimensions.height - 1) as i32;
        let cell = Position::new(x, y);
        can_move_to(world, dimensions, cell).then_some(cell)
    })
}

/// Rats scaled by depth. Returns how many were placed.
pub fn spawn_enemies(
    world: &mut World,
    dimensions: MapDimensions,
    floor: u32,
    rng: &mut GameRng,
) -> Result<usize, StoreError> {
    let base = 5 + floor / 2;
    let count = rng.range(base, base + 5);
    let hp = 3 + floor / 3;
    let damage_min = 1 + floor / 4;
    let damage_max = 2 + floor / 3;
    let aggro_range = GameConfig::DEFAULT_AGGRO_RANGE + floor / 5;

    let mut placed = 0;
    for _ in 0..count {
        let Some(cell) = random_open_cell(world, dimensions, rng) else {
            warn!(floor, "no free cell for enemy");
            continue;
        };
        let brain = if rng.chance(0.7 + floor as f32 * 0.02) {
            Brain::hunt(aggro_range)
        } else {
            Brain::Wander
        };

        let id = world.create();
        world.add(id, cell)?;
        world.add(id, RenderGlyph::new('r', 0xCC8855, 10))?;
        world.add(id, Blocks)?;
        world.add(id, Faction::Mob)?;
        world.add(id, Name::new("Rat"))?;
        world.add(id, Actor::new(100))?;
        world.add(id, Health::new(hp, 0))?;
        world.add(id, Melee::physical(damage_min, damage_max))?;
        world.add(id, brain)?;
        placed += 1;
    }
    debug!(floor, requested = count, placed, "enemies spawned");
    Ok(placed)
}

/// Guardian of the last floor, placed inside the stairs room.
pub fn spawn_boss(
    world: &mut World,
    dungeon: &Dungeon,
    rng: &mut GameRng,
) -> Result<Option<EntityId>, StoreError> {
    let dimensions = dungeon.dimensions;
    let candidates: Vec<Position> = match dungeon.room_containing(dungeon.stairs_down) {
        Some(index) => dungeon.rooms[index]
            .cells()
            .filter(|cell| *cell != dungeon.stairs_down && can_move_to(world, dimensions, *cell))
            .collect(),
        None => Vec::new(),
    };
    let cell = match rng.choose(&candidates) {
        Some(cell) => *cell,
        None => match random_open_cell(world, dimensions, rng) {
            Some(cell) => cell,
            None => {
                warn!("no free cell for the boss");
                return Ok(None);
            }
        },
    };

    let id = world.create();
    world.add(id, cell)?;
    world.add(id, RenderGlyph::new('O', colors::PURPLE, 10))?;
    world.add(id, Blocks)?;
    world.add(id, Faction::Mob)?;
    world.add(id, Name::new("Orc Warlord"))?;
    world.add(id, Actor::new(100))?;
    world.add(id, Health::new(30, 2))?;
    world.add(id, Melee::physical(4, 8))?;
    world.add(id, Brain::Boss { aggro_range: 10 })?;
    debug!(boss = %id, %cell, "boss spawned");
    Ok(Some(id))
}

/// One potion per spawn point; small ones are more common.
pub fn spawn_items(
    world: &mut World,
    dungeon: &Dungeon,
    config: &GameConfig,
    rng: &mut GameRng,
) -> Result<usize, StoreError> {
    for cell in &dungeon.item_spawn_points {
        let kind = if rng.chance(config.items.small_potion_chance) {
            ItemKind::SmallHealthPotion
        } else {
            ItemKind::HealthPotion
        };
        spawn_item(world, *cell, kind, &config.items)?;
    }
    Ok(dungeon.item_spawn_points.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DiggerConfig, ItemSpawnConfig};
    use crate::ecs::{ComponentSet, Item};
    use crate::map::generate;

    #[test]
    fn floor_headings_follow_depth() {
        assert_eq!(floor_description(1, 10), "The entrance");
        assert_eq!(floor_description(3, 10), "Upper levels");
        assert_eq!(floor_description(6, 10), "The depths");
        assert_eq!(floor_description(9, 10), "Deep caverns");
        assert_eq!(floor_description(10, 10), "The final floor!");
        assert_eq!(floor_description(11, 10), "Unknown depths");
    }

    #[test]
    fn enemies_never_overlap_blockers() {
        let mut rng = GameRng::new(5);
        let dungeon = generate(40, 30, &DiggerConfig::default(), &ItemSpawnConfig::default(), &mut rng);
        let mut world = World::new();
        crate::map::populate(&mut world, &dungeon).unwrap();

        let placed = spawn_enemies(&mut world, dungeon.dimensions, 4, &mut rng).unwrap();
        assert!(placed > 0);

        let mobs: Vec<EntityId> = world.query(ComponentSet::BRAIN | ComponentSet::POSITION).collect();
        assert_eq!(mobs.len(), placed);
        for mob in mobs {
            let cell = world.position(mob).unwrap();
            assert!(dungeon.is_walkable(cell));
            let blockers = world.entities_at(cell).filter(|id| world.has::<Blocks>(*id)).count();
            assert_eq!(blockers, 1);
            assert_eq!(world.get::<Health>(mob).unwrap().max, 4);
        }
    }

    #[test]
    fn clearing_keeps_player_and_carried_items() {
        let mut world = World::new();
        let player = spawn_player(&mut world, &PlayerConfig::default()).unwrap();
        let carried = world.create();
        world
            .add(
                carried,
                Item {
                    kind: ItemKind::HealthPotion,
                    effect: ItemKind::HealthPotion.effect(&ItemSpawnConfig::default()),
                },
            )
            .unwrap();
        world.get_mut::<Inventory>(player).unwrap().slots.push(carried);
        let loose = world.create();
        world.add(loose, Position::new(3, 3)).unwrap();

        assert_eq!(clear_level(&mut world, player), 1);
        assert!(world.is_alive(player));
        assert!(world.is_alive(carried));
        assert!(!world.is_alive(loose));
    }
}
