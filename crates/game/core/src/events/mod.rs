//! Domain events and the synchronous bus that dispatches them.

mod bus;
mod types;

pub use bus::{EventBus, ListenerId};
pub use types::{EventKind, GameEvent, StatusEffect, colors};
