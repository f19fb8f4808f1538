//! Single-step movement and collision.
//!
//! A cell is enterable when it is inside the map and none of its occupants
//! carries [`Blocks`]. Terrain walls are blocking entities like any other, so
//! the same test covers walls, doors-as-floor and other actors.

use crate::ecs::{Blocks, EntityId, MapDimensions, Position, StoreError, Tile, World};
use crate::error::{ErrorSeverity, GameError};
use crate::events::{EventBus, GameEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("entity {0} cannot move: {1}")]
    Store(EntityId, StoreError),

    #[error("step ({dx}, {dy}) is not a single-tile move")]
    InvalidStep { dx: i32, dy: i32 },

    #[error("destination {destination} is out of bounds")]
    OutOfBounds { destination: Position },

    #[error("destination {destination} is blocked")]
    Blocked { destination: Position },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Store(..) | Self::InvalidStep { .. } => ErrorSeverity::Validation,
            Self::OutOfBounds { .. } | Self::Blocked { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Store(..) => "MOVE_INVALID_ENTITY",
            Self::InvalidStep { .. } => "MOVE_INVALID_STEP",
            Self::OutOfBounds { .. } => "MOVE_OUT_OF_BOUNDS",
            Self::Blocked { .. } => "MOVE_BLOCKED",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardinalDirection {
    North,
    South,
    West,
    East,
}

impl CardinalDirection {
    /// Fixed enumeration order; randomised choices index into it.
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::South,
        CardinalDirection::West,
        CardinalDirection::East,
    ];

    /// Screen-space delta: north is `y - 1`.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, -1),
            CardinalDirection::South => (0, 1),
            CardinalDirection::West => (-1, 0),
            CardinalDirection::East => (1, 0),
        }
    }
}

/// `false` if `destination` is out of bounds or holds a blocking occupant.
pub fn can_move_to(world: &World, dimensions: MapDimensions, destination: Position) -> bool {
    dimensions.contains(destination) && !is_blocked(world, destination)
}

pub fn is_blocked(world: &World, position: Position) -> bool {
    world.find_at::<Blocks>(position).is_some()
}

/// The blocking occupant of `position`, other than terrain.
pub fn blocker_at(world: &World, position: Position) -> Option<EntityId> {
    world
        .entities_at(position)
        .find(|id| world.has::<Blocks>(*id) && !world.has::<Tile>(*id))
}

/// Moves `entity` by one step, emitting `Moved` on success.
///
/// Each of `dx` and `dy` must be in `-1..=1` and not both zero. On error
/// nothing changes.
pub fn try_move(
    world: &mut World,
    events: &mut EventBus,
    dimensions: MapDimensions,
    entity: EntityId,
    dx: i32,
    dy: i32,
) -> Result<Position, MoveError> {
    if dx.abs() > 1 || dy.abs() > 1 || (dx == 0 && dy == 0) {
        return Err(MoveError::InvalidStep { dx, dy });
    }

    let from = *world
        .try_get::<Position>(entity)
        .map_err(|err| MoveError::Store(entity, err))?;
    let destination = from.offset(dx, dy);

    if !dimensions.contains(destination) {
        return Err(MoveError::OutOfBounds { destination });
    }
    if is_blocked(world, destination) {
        return Err(MoveError::Blocked { destination });
    }

    world
        .relocate(entity, destination)
        .map_err(|err| MoveError::Store(entity, err))?;
    events.push(GameEvent::Moved {
        who: entity,
        from,
        to: destination,
    });
    tracing::trace!(%entity, %from, to = %destination, "moved");
    Ok(destination)
}

/// Boolean form of [`try_move`].
pub fn move_entity(
    world: &mut World,
    events: &mut EventBus,
    dimensions: MapDimensions,
    entity: EntityId,
    dx: i32,
    dy: i32,
) -> bool {
    try_move(world, events, dimensions, entity, dx, dy).is_ok()
}
