//! Pickups, held items and consumables.

use crate::config::ItemSpawnConfig;
use crate::ecs::{
    EntityId, Health, Inventory, Item, ItemEffect, ItemKind, Name, Position, RenderGlyph,
    StoreError, World,
};
use crate::error::{ErrorSeverity, GameError};
use crate::events::{EventBus, GameEvent, colors};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("entity {0} cannot carry items")]
    NoInventory(EntityId),

    #[error("nothing to pick up at {0}")]
    NothingHere(Position),

    #[error("inventory of {0} is full")]
    Full(EntityId),

    #[error("slot {index} is out of range (holding {len})")]
    InvalidSlot { index: usize, len: usize },

    #[error("entity {0} is not a usable item")]
    NotUsable(EntityId),
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Store(err) => err.severity(),
            Self::Full(_) | Self::NothingHere(_) => ErrorSeverity::Recoverable,
            Self::NoInventory(_) | Self::InvalidSlot { .. } | Self::NotUsable(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Store(err) => err.error_code(),
            Self::NoInventory(_) => "INVENTORY_MISSING",
            Self::NothingHere(_) => "INVENTORY_NOTHING_HERE",
            Self::Full(_) => "INVENTORY_FULL",
            Self::InvalidSlot { .. } => "INVENTORY_INVALID_SLOT",
            Self::NotUsable(_) => "INVENTORY_NOT_USABLE",
        }
    }
}

impl ItemKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ItemKind::HealthPotion => "Health Potion",
            ItemKind::SmallHealthPotion => "Small Health Potion",
        }
    }

    pub fn glyph(self) -> RenderGlyph {
        match self {
            ItemKind::HealthPotion => RenderGlyph::new('!', 0xFF0000, 5),
            ItemKind::SmallHealthPotion => RenderGlyph::new('!', 0xCC6666, 5),
        }
    }

    pub fn effect(self, config: &ItemSpawnConfig) -> ItemEffect {
        match self {
            ItemKind::HealthPotion => ItemEffect::Heal {
                amount: config.potion_heal,
            },
            ItemKind::SmallHealthPotion => ItemEffect::Heal {
                amount: config.small_potion_heal,
            },
        }
    }
}

/// Places an item of `kind` on the floor at `position`.
pub fn spawn_item(
    world: &mut World,
    position: Position,
    kind: ItemKind,
    config: &ItemSpawnConfig,
) -> Result<EntityId, StoreError> {
    let id = world.create();
    world.add(id, position)?;
    world.add(id, kind.glyph())?;
    world.add(id, Name::new(kind.display_name()))?;
    world.add(
        id,
        Item {
            kind,
            effect: kind.effect(config),
        },
    )?;
    Ok(id)
}

/// The first world-placed item on `position`.
pub fn item_at(world: &World, position: Position) -> Option<EntityId> {
    world.find_at::<Item>(position)
}

/// Moves the item under `holder` into its inventory.
///
/// The item loses its Position and is appended to the holder's slots. Emits
/// `PickedItem` and a message.
pub fn try_pickup(
    world: &mut World,
    events: &mut EventBus,
    holder: EntityId,
) -> Result<EntityId, InventoryError> {
    let position = *world.try_get::<Position>(holder)?;
    if !world.has::<Inventory>(holder) {
        return Err(InventoryError::NoInventory(holder));
    }
    let item = item_at(world, position).ok_or(InventoryError::NothingHere(position))?;

    let inventory = world.try_get_mut::<Inventory>(holder)?;
    if inventory.is_full() {
        return Err(InventoryError::Full(holder));
    }
    inventory.slots.push(item);
    world.remove::<Position>(item);

    let name = world.name_or(item, "item").to_owned();
    events.push(GameEvent::PickedItem { who: holder, item });
    events.push(GameEvent::message(format!("Picked up {name}!"), colors::CYAN));
    tracing::debug!(%holder, %item, "picked up item");
    Ok(item)
}

/// Applies `item` to `user` and destroys it.
///
/// Heal effects raise hp by at most the missing amount and emit `Healed` only
/// when something was restored; the item is consumed either way and leaves
/// every inventory that held it. Returns the hp restored.
pub fn try_use_item(
    world: &mut World,
    events: &mut EventBus,
    item: EntityId,
    user: EntityId,
) -> Result<u32, InventoryError> {
    let effect = world
        .get::<Item>(item)
        .map(|item| item.effect)
        .ok_or(InventoryError::NotUsable(item))?;

    let healed = match effect {
        ItemEffect::Heal { amount } => world.try_get_mut::<Health>(user)?.heal(amount),
    };

    if healed > 0 {
        events.push(GameEvent::Healed {
            who: user,
            amount: healed,
        });
        let name = world.name_or(user, "Entity").to_owned();
        events.push(GameEvent::message(
            format!("{name} healed for {healed} HP!"),
            colors::GREEN,
        ));
    }
    release_from_inventories(world, item);
    world.destroy(item);
    Ok(healed)
}

fn release_from_inventories(world: &mut World, item: EntityId) {
    let holders: Vec<EntityId> = world
        .iter::<Inventory>()
        .filter(|(_, inventory)| inventory.slots.contains(&item))
        .map(|(id, _)| id)
        .collect();
    for holder in holders {
        if let Some(inventory) = world.get_mut::<Inventory>(holder) {
            inventory.slots.retain(|slot| *slot != item);
        }
    }
}

/// Boolean form of [`try_use_item`].
pub fn use_item(world: &mut World, events: &mut EventBus, item: EntityId, user: EntityId) -> bool {
    try_use_item(world, events, item, user).is_ok()
}

/// Uses the item in `user`'s slot `index`; later slots shift down.
pub fn use_slot(
    world: &mut World,
    events: &mut EventBus,
    user: EntityId,
    index: usize,
) -> Result<u32, InventoryError> {
    let slots = &world
        .get::<Inventory>(user)
        .ok_or(InventoryError::NoInventory(user))?
        .slots;
    let item = *slots.get(index).ok_or(InventoryError::InvalidSlot {
        index,
        len: slots.len(),
    })?;

    try_use_item(world, events, item, user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    fn holder(world: &mut World, hp: u32, max: u32) -> EntityId {
        let id = world.create();
        world.add(id, Position::new(3, 3)).unwrap();
        world.add(id, Name::new("Player")).unwrap();
        world.add(id, Health { hp, max, armor: 0 }).unwrap();
        world.add(id, Inventory::empty()).unwrap();
        id
    }

    #[test]
    fn potion_heal_is_clamped_and_item_destroyed() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let user = holder(&mut world, 15, 20);
        let potion = spawn_item(
            &mut world,
            Position::new(0, 0),
            ItemKind::HealthPotion,
            &ItemSpawnConfig::default(),
        )
        .unwrap();

        assert!(use_item(&mut world, &mut events, potion, user));
        assert_eq!(world.get::<Health>(user).unwrap().hp, 20);
        assert!(!world.is_alive(potion));

        let healed: Vec<_> = events
            .drain()
            .into_iter()
            .filter(|e| e.kind() == EventKind::Healed)
            .collect();
        assert_eq!(healed, vec![GameEvent::Healed { who: user, amount: 5 }]);
    }

    #[test]
    fn potion_is_consumed_even_at_full_health() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let user = holder(&mut world, 20, 20);
        let potion = spawn_item(
            &mut world,
            Position::new(0, 0),
            ItemKind::SmallHealthPotion,
            &ItemSpawnConfig::default(),
        )
        .unwrap();

        assert_eq!(try_use_item(&mut world, &mut events, potion, user), Ok(0));
        assert!(!world.is_alive(potion));
        assert!(events.is_empty());
    }

    #[test]
    fn pickup_moves_item_into_slots() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let user = holder(&mut world, 10, 20);
        let potion = spawn_item(
            &mut world,
            Position::new(3, 3),
            ItemKind::HealthPotion,
            &ItemSpawnConfig::default(),
        )
        .unwrap();

        assert_eq!(try_pickup(&mut world, &mut events, user), Ok(potion));
        assert!(world.position(potion).is_none());
        assert_eq!(world.get::<Inventory>(user).unwrap().slots.as_slice(), &[potion]);
        assert!(events.pending().contains(&GameEvent::PickedItem { who: user, item: potion }));

        assert_eq!(
            try_pickup(&mut world, &mut events, user),
            Err(InventoryError::NothingHere(Position::new(3, 3)))
        );
    }

    #[test]
    fn full_inventory_rejects_pickup() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let user = holder(&mut world, 10, 20);
        let config = ItemSpawnConfig::default();
        for _ in 0..Inventory::empty().capacity() {
            let item = spawn_item(&mut world, Position::new(3, 3), ItemKind::SmallHealthPotion, &config)
                .unwrap();
            world.remove::<Position>(item);
            world.get_mut::<Inventory>(user).unwrap().slots.push(item);
        }
        let floor_item =
            spawn_item(&mut world, Position::new(3, 3), ItemKind::HealthPotion, &config).unwrap();

        assert_eq!(
            try_pickup(&mut world, &mut events, user),
            Err(InventoryError::Full(user))
        );
        assert_eq!(world.position(floor_item), Some(Position::new(3, 3)));
    }

    #[test]
    fn using_a_held_item_directly_frees_its_slot() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let user = holder(&mut world, 5, 20);
        let config = ItemSpawnConfig::default();
        let first = spawn_item(&mut world, Position::new(3, 3), ItemKind::HealthPotion, &config)
            .unwrap();
        try_pickup(&mut world, &mut events, user).unwrap();
        let second = spawn_item(&mut world, Position::new(3, 3), ItemKind::SmallHealthPotion, &config)
            .unwrap();
        try_pickup(&mut world, &mut events, user).unwrap();

        assert!(use_item(&mut world, &mut events, first, user));
        assert_eq!(world.get::<Inventory>(user).unwrap().slots.as_slice(), &[second]);
    }

    #[test]
    fn use_slot_validates_index_and_compacts() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let user = holder(&mut world, 5, 20);
        let config = ItemSpawnConfig::default();
        let small = spawn_item(&mut world, Position::new(3, 3), ItemKind::SmallHealthPotion, &config)
            .unwrap();
        try_pickup(&mut world, &mut events, user).unwrap();

        assert_eq!(
            use_slot(&mut world, &mut events, user, 1),
            Err(InventoryError::InvalidSlot { index: 1, len: 1 })
        );
        assert_eq!(use_slot(&mut world, &mut events, user, 0), Ok(5));
        assert!(world.get::<Inventory>(user).unwrap().slots.is_empty());
        assert!(!world.is_alive(small));
    }
}
