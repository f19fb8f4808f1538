//! What an actor wants to do this turn.

use crate::ecs::EntityId;
use crate::movement::CardinalDirection;

/// One logical decision, produced by the player's input source or by the AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    /// Step by `(dx, dy)`. Player moves are cardinal; fleeing AI may step diagonally.
    Move { dx: i32, dy: i32 },
    Attack { target: EntityId },
    Wait,
    Action(PlayerAction),
}

/// Non-movement commands available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerAction {
    Pickup,
    /// Opens the inventory; never costs a turn.
    Inventory,
    /// Opens the help screen; never costs a turn.
    Help,
    Ascend,
    Descend,
    UseItem { index: usize },
}

impl Intent {
    pub const fn step(direction: CardinalDirection) -> Self {
        let (dx, dy) = direction.delta();
        Intent::Move { dx, dy }
    }

    pub const fn is_cardinal_move(&self) -> bool {
        matches!(self, Intent::Move { dx, dy } if (*dx == 0) != (*dy == 0) && dx.abs() <= 1 && dy.abs() <= 1)
    }
}

impl From<PlayerAction> for Intent {
    fn from(action: PlayerAction) -> Self {
        Intent::Action(action)
    }
}
