//! Per-session counters for the end-of-game report.

/// How the session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameStats {
    pub floor: u32,
    /// Kills landed by the player.
    pub enemies_killed: u32,
    pub items_collected: u32,
    /// Player turns that consumed energy.
    pub turns_survived: u64,
    pub last_killer: Option<String>,
    pub victory: bool,
}

impl GameStats {
    pub fn new() -> Self {
        Self {
            floor: 1,
            ..Self::default()
        }
    }
}

/// Final snapshot handed to the host when the game is over.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameOverReport {
    pub outcome: GameOutcome,
    pub stats: GameStats,
    /// SHA-256 of the final world state, see [`super::state_digest`].
    pub digest: [u8; 32],
}
