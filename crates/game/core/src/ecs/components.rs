//! Component families attached to entities.
//!
//! The set of component kinds is closed: every kind has a [`ComponentKind`] tag,
//! a matching [`ComponentSet`] flag and a dedicated typed storage inside the
//! [`World`](super::World). An entity is nothing more than the set of
//! components it currently carries.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::combat::DamageType;
use crate::config::GameConfig;

use super::entity::EntityId;

/// Tag for each component family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumCount, strum::EnumIter, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentKind {
    Position,
    RenderGlyph,
    Blocks,
    Transparent,
    Light,
    Faction,
    Actor,
    Health,
    Inventory,
    Melee,
    Brain,
    Name,
    Item,
    Tile,
}

impl ComponentKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// The single-bit set for this kind.
    pub const fn flag(self) -> ComponentSet {
        ComponentSet::from_bits_retain(1 << self as u16)
    }
}

bitflags! {
    /// Bitmask of component kinds, used as an entity's signature and as query input.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ComponentSet: u16 {
        const POSITION = 1 << ComponentKind::Position as u16;
        const RENDER_GLYPH = 1 << ComponentKind::RenderGlyph as u16;
        const BLOCKS = 1 << ComponentKind::Blocks as u16;
        const TRANSPARENT = 1 << ComponentKind::Transparent as u16;
        const LIGHT = 1 << ComponentKind::Light as u16;
        const FACTION = 1 << ComponentKind::Faction as u16;
        const ACTOR = 1 << ComponentKind::Actor as u16;
        const HEALTH = 1 << ComponentKind::Health as u16;
        const INVENTORY = 1 << ComponentKind::Inventory as u16;
        const MELEE = 1 << ComponentKind::Melee as u16;
        const BRAIN = 1 << ComponentKind::Brain as u16;
        const NAME = 1 << ComponentKind::Name as u16;
        const ITEM = 1 << ComponentKind::Item as u16;
        const TILE = 1 << ComponentKind::Tile as u16;
    }
}

impl ComponentSet {
    /// Iterates the kinds contained in this set.
    pub fn kinds(self) -> impl Iterator<Item = ComponentKind> {
        use strum::IntoEnumIterator;
        ComponentKind::iter().filter(move |kind| self.contains(kind.flag()))
    }
}

/// Presentation hint. Written once at spawn and never read by simulation rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderGlyph {
    pub code: u32,
    pub fg: u32,
    pub bg: Option<u32>,
    pub z: i32,
}

impl RenderGlyph {
    pub const fn new(code: char, fg: u32, z: i32) -> Self {
        Self {
            code: code as u32,
            fg,
            bg: None,
            z,
        }
    }

    pub const fn with_bg(mut self, bg: u32) -> Self {
        self.bg = Some(bg);
        self
    }
}

/// Marker: the occupant prevents movement into (and targeting through) its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blocks;

/// Whether sight passes through the occupant's cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transparent(pub bool);

/// Light source emitted from the entity's position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Light {
    pub radius: u32,
    pub intensity: f32,
    /// RGB packed as `0xRRGGBB`.
    pub color: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Faction {
    Player,
    Mob,
    Neutral,
}

impl Faction {
    /// Player and mobs fight each other; neutrals fight nobody.
    pub fn is_hostile_to(self, other: Faction) -> bool {
        matches!(
            (self, other),
            (Faction::Player, Faction::Mob) | (Faction::Mob, Faction::Player)
        )
    }
}

/// Turn-scheduling state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub energy: u32,
    pub speed: u32,
}

impl Actor {
    pub const fn new(speed: u32) -> Self {
        Self { energy: 0, speed }
    }
}

/// Hit points and flat damage mitigation.
///
/// `hp <= max` holds after every mutation; an entity whose hp reaches zero is
/// destroyed in the same step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Health {
    pub hp: u32,
    pub max: u32,
    pub armor: u32,
}

impl Health {
    pub const fn new(max: u32, armor: u32) -> Self {
        Self { hp: max, max, armor }
    }

    /// Remaining hp as a percentage of max (0..=100).
    pub fn percent(&self) -> u32 {
        if self.max == 0 {
            return 0;
        }
        self.hp * 100 / self.max
    }

    /// Restores up to `amount` hp without exceeding max. Returns the hp actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max);
        self.hp - before
    }
}

pub type InventorySlots = ArrayVec<EntityId, { GameConfig::MAX_INVENTORY_SLOTS }>;

/// Ordered list of held item entities.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    pub slots: InventorySlots,
}

impl Inventory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
}

/// Melee damage range. Invariant: `damage_min <= damage_max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Melee {
    pub damage_min: u32,
    pub damage_max: u32,
    pub damage_type: DamageType,
}

impl Melee {
    /// Builds a range, swapping the bounds if given out of order.
    pub fn new(damage_min: u32, damage_max: u32, damage_type: DamageType) -> Self {
        Self {
            damage_min: damage_min.min(damage_max),
            damage_max: damage_max.max(damage_min),
            damage_type,
        }
    }

    pub fn physical(damage_min: u32, damage_max: u32) -> Self {
        Self::new(damage_min, damage_max, DamageType::Physical)
    }
}

/// Behaviour selector with per-kind tunables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Brain {
    /// Random orthogonal steps, idling half of the time.
    Wander,
    /// Chases the player inside `aggro_range`, retreats when badly hurt.
    Hunt { aggro_range: u32, flee_range: u32 },
    /// Keeps away from the player inside `flee_range`.
    Flee { flee_range: u32 },
    /// Like hunt, but never retreats.
    Boss { aggro_range: u32 },
}

impl Brain {
    pub const fn hunt(aggro_range: u32) -> Self {
        Brain::Hunt {
            aggro_range,
            flee_range: GameConfig::DEFAULT_FLEE_RANGE,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Brain::Wander => "wander",
            Brain::Hunt { .. } => "hunt",
            Brain::Flee { .. } => "flee",
            Brain::Boss { .. } => "boss",
        }
    }
}

/// Display identity, also used for death attribution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Catalogue of pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    HealthPotion,
    SmallHealthPotion,
}

/// Type-specific payload of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    Heal { amount: u32 },
}

/// Marks an entity as a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub kind: ItemKind,
    pub effect: ItemEffect,
}

/// Static terrain flags of one map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub walkable: bool,
    pub blocks_light: bool,
}
