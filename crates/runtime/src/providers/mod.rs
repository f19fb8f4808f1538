//! Built-in intent providers.

mod autopilot;
mod scripted;

pub use autopilot::AutoPilotProvider;
pub use scripted::ScriptedProvider;
