//! NPC decision making.
//!
//! [`decide`] reads the world and returns an [`Intent`]; it never mutates
//! anything except the random stream. Dispatch is by [`Brain`] kind, see
//! [`behaviors`].

pub mod behaviors;
pub mod pathfind;

use crate::config::GameConfig;
use crate::ecs::{Actor, Brain, EntityId, MapDimensions, Position, World};
use crate::intent::Intent;
use crate::movement::can_move_to;
use crate::rng::GameRng;

pub use pathfind::find_path;

/// Read-only view the behaviours decide against.
#[derive(Clone, Copy, Debug)]
pub struct AiContext<'a> {
    pub world: &'a World,
    pub dimensions: MapDimensions,
    /// Cached player id, `None` when the player is gone.
    pub player: Option<EntityId>,
}

impl<'a> AiContext<'a> {
    pub fn new(world: &'a World, dimensions: MapDimensions) -> Self {
        Self {
            world,
            dimensions,
            player: world.player(),
        }
    }

    pub fn player_position(&self) -> Option<Position> {
        self.player.and_then(|player| self.world.position(player))
    }

    pub fn can_move_to(&self, position: Position) -> bool {
        can_move_to(self.world, self.dimensions, position)
    }
}

/// Chooses the intent for `entity`.
///
/// Entities without a Brain or Position, or without enough energy to act,
/// always wait.
pub fn decide(ctx: &AiContext<'_>, rng: &mut GameRng, entity: EntityId) -> Intent {
    let Some(brain) = ctx.world.get::<Brain>(entity).copied() else {
        return Intent::Wait;
    };
    let Some(position) = ctx.world.position(entity) else {
        return Intent::Wait;
    };
    let ready = ctx
        .world
        .get::<Actor>(entity)
        .is_some_and(|actor| actor.energy >= GameConfig::ENERGY_THRESHOLD);
    if !ready {
        return Intent::Wait;
    }

    let intent = match brain {
        Brain::Wander => behaviors::wander(ctx, rng, position),
        Brain::Hunt {
            aggro_range,
            flee_range,
        } => behaviors::hunt(ctx, rng, entity, position, aggro_range, Some(flee_range)),
        Brain::Boss { aggro_range } => {
            behaviors::hunt(ctx, rng, entity, position, aggro_range, None)
        }
        Brain::Flee { flee_range } => behaviors::flee(ctx, rng, position, flee_range),
    };
    tracing::trace!(%entity, brain = brain.kind_name(), ?intent, "ai decided");
    intent
}
