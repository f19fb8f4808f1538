//! Deterministic dungeon-crawl simulation kernel.
//!
//! `game-core` holds the canonical rules: the entity store, the event bus,
//! level generation, movement, vision, the energy scheduler, combat, AI and
//! items. [`engine::GameEngine`] ties them into a session that advances one
//! scheduler step at a time and suspends whenever the player must act. Hosts
//! (the runtime, tests, offline tools) drive it through the types re-exported
//! here.
pub mod ai;
pub mod combat;
pub mod config;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod events;
pub mod intent;
pub mod inventory;
pub mod map;
pub mod movement;
pub mod rng;
pub mod vision;

pub use ai::{AiContext, decide, find_path};
pub use combat::{AttackCategory, AttackReport, DamageType, attack, resolve_attack};
pub use config::{DiggerConfig, GameConfig, ItemSpawnConfig, PlayerConfig};
pub use ecs::{
    Actor, Blocks, Brain, ComponentKind, ComponentSet, EntityId, Faction, Health, Inventory, Item,
    ItemEffect, ItemKind, Light, MapDimensions, Melee, Name, Position, RenderGlyph, StoreError,
    Tile, Transparent, World,
};
pub use engine::{
    EnergyScheduler, EngineError, GameEngine, GameOutcome, GameOverReport, GameStats,
    IntentOutcome, Menu, SchedulerState, StepOutcome, TurnStep,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{EventBus, EventKind, GameEvent, ListenerId, StatusEffect, colors};
pub use intent::{Intent, PlayerAction};
pub use inventory::{InventoryError, use_item};
pub use map::{Dungeon, Room, TileKind};
pub use movement::{CardinalDirection, MoveError, can_move_to, move_entity};
pub use rng::GameRng;
pub use vision::{FieldOfView, LightLevel, LightMap, OpacityGrid, mix_colors};
