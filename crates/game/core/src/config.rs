/// Game configuration constants and tunable parameters.
///
/// Runtime-tunable values live in the struct (and can be loaded from TOML by
/// `game-content`); capacities that shape types are associated consts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub map_width: u32,
    pub map_height: u32,
    /// Player sight radius in tiles.
    pub fov_radius: u32,
    /// Deepest floor; descending from it wins the game.
    pub final_floor: u32,
    pub player: PlayerConfig,
    pub digger: DiggerConfig,
    pub items: ItemSpawnConfig,
}

/// Starting stats of the player character.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    pub hp: u32,
    pub armor: u32,
    pub damage_min: u32,
    pub damage_max: u32,
    pub speed: u32,
    pub torch_radius: u32,
    pub torch_intensity: f32,
    pub torch_color: u32,
    /// HP restored when stepping down to a new floor.
    pub descend_heal: u32,
}

/// Room-and-corridor digger parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiggerConfig {
    pub room_min: u32,
    pub room_max: u32,
    pub corridor_min: u32,
    pub corridor_max: u32,
    /// Fraction of the carvable area to dig before stopping.
    pub dug_percentage: f32,
    /// Maximum feature placement attempts.
    pub iteration_budget: u32,
    /// Chance that a room connector becomes a door.
    pub door_chance: f32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemSpawnConfig {
    pub min_items: u32,
    pub max_items: u32,
    /// Attempts per spawn point before the item is skipped.
    pub placement_retries: u32,
    pub small_potion_chance: f32,
    pub potion_heal: u32,
    pub small_potion_heal: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_INVENTORY_SLOTS: usize = 20;

    // ===== scheduling =====
    /// Energy needed before an actor may act.
    pub const ENERGY_THRESHOLD: u32 = 100;
    /// Energy deducted by every turn-consuming action.
    pub const ACTION_COST: u32 = 100;

    // ===== AI defaults =====
    pub const DEFAULT_AGGRO_RANGE: u32 = 6;
    pub const DEFAULT_FLEE_RANGE: u32 = 4;
    /// Hunters below this share of max hp switch to fleeing.
    pub const FLEE_HEALTH_PERCENT: u32 = 30;

    // ===== spawning =====
    pub const SPAWN_ATTEMPTS: u32 = 100;

    pub const DEFAULT_MAP_WIDTH: u32 = 80;
    pub const DEFAULT_MAP_HEIGHT: u32 = 45;
    pub const DEFAULT_FOV_RADIUS: u32 = 10;
    pub const DEFAULT_FINAL_FLOOR: u32 = 10;

    pub fn new() -> Self {
        Self {
            map_width: Self::DEFAULT_MAP_WIDTH,
            map_height: Self::DEFAULT_MAP_HEIGHT,
            fov_radius: Self::DEFAULT_FOV_RADIUS,
            final_floor: Self::DEFAULT_FINAL_FLOOR,
            player: PlayerConfig::default(),
            digger: DiggerConfig::default(),
            items: ItemSpawnConfig::default(),
        }
    }

    pub fn with_map_size(mut self, width: u32, height: u32) -> Self {
        self.map_width = width;
        self.map_height = height;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            hp: 20,
            armor: 0,
            damage_min: 2,
            damage_max: 4,
            speed: 100,
            torch_radius: 8,
            torch_intensity: 1.0,
            torch_color: 0xFFCC66,
            descend_heal: 5,
        }
    }
}

impl Default for DiggerConfig {
    fn default() -> Self {
        Self {
            room_min: 3,
            room_max: 9,
            corridor_min: 3,
            corridor_max: 10,
            dug_percentage: 0.2,
            iteration_budget: 1000,
            door_chance: 0.5,
        }
    }
}

impl Default for ItemSpawnConfig {
    fn default() -> Self {
        Self {
            min_items: 3,
            max_items: 5,
            placement_retries: 10,
            small_potion_chance: 0.7,
            potion_heal: 10,
            small_potion_heal: 5,
        }
    }
}
