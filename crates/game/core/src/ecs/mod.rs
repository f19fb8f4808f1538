//! Entity-component store.
//!
//! [`World`] owns all game-object state. Entities are opaque ids; their data
//! lives in one typed sparse column per [`ComponentKind`].

mod components;
mod entity;
mod storage;
mod world;

pub use components::{
    Actor, Blocks, Brain, ComponentKind, ComponentSet, Faction, Health, Inventory, InventorySlots,
    Item, ItemEffect, ItemKind, Light, Melee, Name, RenderGlyph, Tile, Transparent,
};
pub use entity::{EntityId, MapDimensions, Position};
pub use storage::SparseSet;
pub use world::{Component, ComponentStorage, MutableComponent, Occupancy, Query, StoreError, World};
