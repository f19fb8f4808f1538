//! Topic-based broadcast of session events.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::{Event, Topic, TurnEvent};
