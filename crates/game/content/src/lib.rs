//! Static narrative content and configuration loaders.
//!
//! This crate houses the text that flavours a session and the TOML loader for
//! [`game_core::GameConfig`]:
//! - Floor themes (name, description, entry line, ambient lines)
//! - Death messages by killer, progress hints and epitaphs
//! - Weighted ambient lines and low-health warnings
//!
//! Content never appears in simulation state. Every random pick draws from a
//! caller-owned [`game_core::GameRng`], so narration replays with the session.

pub mod death;
pub mod messages;
pub mod themes;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use death::{DeathContext, DeathReport, compose_death_report};
pub use messages::{WeightedLine, ambient_line, low_health_line};
pub use themes::{FloorTheme, floor_ambient_line, floor_theme};

#[cfg(feature = "loaders")]
pub use loaders::ConfigLoader;
