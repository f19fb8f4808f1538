//! Procedural dungeon generation.
//!
//! [`generate`] carves a grid of [`TileKind`]s with a room-and-corridor digger;
//! [`populate`] turns the result into per-cell terrain entities in the world.

mod digger;
mod populate;
mod room;
mod tile;

pub use digger::{Dungeon, generate};
pub use populate::populate;
pub use room::Room;
pub use tile::TileKind;
