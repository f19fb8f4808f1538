use serde::{Deserialize, Serialize};

use game_core::{GameEvent, GameOverReport, Menu};
use game_content::DeathReport;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Simulation events and narration messages
    Game,
    /// Session flow: player turns, menus, game over
    Turn,
}

/// Session-level happenings that are not simulation events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// The player is about to decide.
    PlayerTurn { floor: u32, turn: u64 },
    /// The player opened a menu; no time passed.
    MenuRequested(Menu),
    GameOver {
        report: GameOverReport,
        death: Option<DeathReport>,
    },
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Game(GameEvent),
    Turn(TurnEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Game(_) => Topic::Game,
            Event::Turn(_) => Topic::Turn,
        }
    }
}
