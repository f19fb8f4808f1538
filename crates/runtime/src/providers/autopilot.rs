//! A simple bot that plays the game for headless runs.
//!
//! Priorities, first match wins:
//! 1. attack an adjacent hostile
//! 2. drink a potion below 40% hp
//! 3. pick up an item underfoot
//! 4. take the stairs when standing on them
//! 5. walk the shortest path to the stairs, else wait

use async_trait::async_trait;
use game_core::{
    CardinalDirection, EntityId, Faction, Health, Intent, Inventory, PlayerAction, Position,
    can_move_to, find_path, inventory::item_at, movement::blocker_at,
};

use crate::api::{IntentProvider, Result, TurnContext};

const POTION_HEALTH_PERCENT: u32 = 40;

#[derive(Debug, Default, Clone, Copy)]
pub struct AutoPilotProvider;

impl AutoPilotProvider {
    pub fn new() -> Self {
        Self
    }

    /// Pure decision function behind [`IntentProvider::provide_intent`].
    pub fn choose(ctx: &TurnContext<'_>) -> Intent {
        let world = ctx.world;
        let Some(position) = world.position(ctx.player) else {
            return Intent::Wait;
        };

        if let Some(target) = adjacent_hostile(ctx, position) {
            return Intent::Attack { target };
        }

        let inventory = world.get::<Inventory>(ctx.player);
        let wounded = world
            .get::<Health>(ctx.player)
            .is_some_and(|health| health.hp * 100 < health.max * POTION_HEALTH_PERCENT);
        if wounded && inventory.is_some_and(|inventory| !inventory.slots.is_empty()) {
            return PlayerAction::UseItem { index: 0 }.into();
        }

        if item_at(world, position).is_some() && inventory.is_some_and(|inventory| !inventory.is_full()) {
            return PlayerAction::Pickup.into();
        }

        let stairs = ctx.dungeon.stairs_down;
        if position == stairs {
            return PlayerAction::Descend.into();
        }

        let dimensions = ctx.dungeon.dimensions;
        let path = find_path(dimensions, position, stairs, |cell| can_move_to(world, dimensions, cell));
        match path.as_deref() {
            Some([_, next, ..]) => Intent::Move {
                dx: next.x - position.x,
                dy: next.y - position.y,
            },
            _ => Intent::Wait,
        }
    }
}

fn adjacent_hostile(ctx: &TurnContext<'_>, position: Position) -> Option<EntityId> {
    CardinalDirection::ALL.into_iter().find_map(|direction| {
        let (dx, dy) = direction.delta();
        let target = blocker_at(ctx.world, position.offset(dx, dy))?;
        let hostile = ctx
            .world
            .get::<Faction>(target)
            .is_some_and(|faction| Faction::Player.is_hostile_to(*faction));
        (hostile && ctx.world.has::<Health>(target)).then_some(target)
    })
}

#[async_trait]
impl IntentProvider for AutoPilotProvider {
    async fn provide_intent(&self, ctx: &TurnContext<'_>) -> Result<Intent> {
        let intent = Self::choose(ctx);
        tracing::trace!(?intent, "autopilot chose");
        Ok(intent)
    }
}
