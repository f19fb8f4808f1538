//! Energy-based turn scheduling.
//!
//! Every actor accrues `speed` energy per scheduler tick. Whoever holds at
//! least [`GameConfig::ENERGY_THRESHOLD`] may act; among those the highest
//! energy wins, ties going to the lowest entity id. Acting costs
//! [`GameConfig::ACTION_COST`], so surplus energy carries over.

use std::cmp::Reverse;

use crate::config::GameConfig;
use crate::ecs::{Actor, EntityId, World};

/// Scheduler phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedulerState {
    /// Nobody is ready; the next step accrues energy.
    #[default]
    Accruing,
    /// `0` was selected and is resolving its action.
    Acting(EntityId),
}

/// Result of one scheduler step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStep {
    /// This actor holds the turn until [`EnergyScheduler::complete`] is called.
    Ready(EntityId),
    /// Nobody was ready; every actor gained its speed in energy.
    Accrued,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyScheduler {
    state: SchedulerState,
    ticks: u64,
}

impl EnergyScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Accrual ticks performed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The ready actor with the most energy, lowest id first on ties.
    pub fn select_ready(world: &World) -> Option<EntityId> {
        world
            .iter::<Actor>()
            .filter(|(_, actor)| actor.energy >= GameConfig::ENERGY_THRESHOLD)
            .max_by_key(|(id, actor)| (actor.energy, Reverse(*id)))
            .map(|(id, _)| id)
    }

    /// Advances the schedule by one step.
    ///
    /// While an actor is acting the same actor is returned again, as long as it
    /// is still alive.
    pub fn step(&mut self, world: &mut World) -> TurnStep {
        if let SchedulerState::Acting(current) = self.state {
            if world.has::<Actor>(current) {
                return TurnStep::Ready(current);
            }
            self.state = SchedulerState::Accruing;
        }

        if let Some(next) = Self::select_ready(world) {
            self.state = SchedulerState::Acting(next);
            tracing::trace!(actor = %next, "turn selected");
            return TurnStep::Ready(next);
        }

        let ids: Vec<EntityId> = world.iter::<Actor>().map(|(id, _)| id).collect();
        for id in ids {
            if let Some(actor) = world.get_mut::<Actor>(id) {
                actor.energy = actor.energy.saturating_add(actor.speed);
            }
        }
        self.ticks += 1;
        TurnStep::Accrued
    }

    /// Ends the current turn. `spent` deducts the action cost from `actor`.
    pub fn complete(&mut self, world: &mut World, actor: EntityId, spent: bool) {
        if spent && let Some(state) = world.get_mut::<Actor>(actor) {
            state.energy = state.energy.saturating_sub(GameConfig::ACTION_COST);
        }
        if self.state == SchedulerState::Acting(actor) {
            self.state = SchedulerState::Accruing;
        }
    }

    /// Drops any in-flight turn, e.g. when the level is rebuilt.
    pub fn reset(&mut self) {
        self.state = SchedulerState::Accruing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(world: &mut World, energy: u32, speed: u32) -> EntityId {
        let id = world.create();
        world.add(id, Actor { energy, speed }).unwrap();
        id
    }

    #[test]
    fn highest_energy_acts_first() {
        let mut world = World::new();
        let _slow = actor(&mut world, 100, 100);
        let fast = actor(&mut world, 150, 100);

        let mut scheduler = EnergyScheduler::new();
        assert_eq!(scheduler.step(&mut world), TurnStep::Ready(fast));
    }

    #[test]
    fn ties_go_to_lowest_id() {
        let mut world = World::new();
        let first = actor(&mut world, 120, 100);
        let _second = actor(&mut world, 120, 100);

        assert_eq!(EnergyScheduler::select_ready(&world), Some(first));
    }

    #[test]
    fn accrues_only_when_nobody_is_ready() {
        let mut world = World::new();
        let a = actor(&mut world, 0, 50);
        let b = actor(&mut world, 30, 100);

        let mut scheduler = EnergyScheduler::new();
        assert_eq!(scheduler.step(&mut world), TurnStep::Accrued);
        assert_eq!(world.get::<Actor>(a).unwrap().energy, 50);
        assert_eq!(world.get::<Actor>(b).unwrap().energy, 130);

        assert_eq!(scheduler.step(&mut world), TurnStep::Ready(b));
        assert_eq!(world.get::<Actor>(a).unwrap().energy, 50);
        assert_eq!(scheduler.ticks(), 1);
    }

    #[test]
    fn acting_deducts_fixed_cost_and_banks_surplus() {
        let mut world = World::new();
        let a = actor(&mut world, 170, 100);

        let mut scheduler = EnergyScheduler::new();
        assert_eq!(scheduler.step(&mut world), TurnStep::Ready(a));
        assert_eq!(scheduler.step(&mut world), TurnStep::Ready(a));
        scheduler.complete(&mut world, a, true);

        assert_eq!(world.get::<Actor>(a).unwrap().energy, 70);
        assert_eq!(scheduler.state(), SchedulerState::Accruing);
    }

    #[test]
    fn unspent_turn_keeps_energy() {
        let mut world = World::new();
        let a = actor(&mut world, 100, 100);

        let mut scheduler = EnergyScheduler::new();
        scheduler.step(&mut world);
        scheduler.complete(&mut world, a, false);
        assert_eq!(world.get::<Actor>(a).unwrap().energy, 100);
    }

    #[test]
    fn destroyed_actor_releases_the_turn() {
        let mut world = World::new();
        let a = actor(&mut world, 100, 100);
        let b = actor(&mut world, 0, 100);

        let mut scheduler = EnergyScheduler::new();
        assert_eq!(scheduler.step(&mut world), TurnStep::Ready(a));
        world.destroy(a);
        assert_eq!(scheduler.step(&mut world), TurnStep::Accrued);
        assert_eq!(world.get::<Actor>(b).unwrap().energy, 100);
    }
}
