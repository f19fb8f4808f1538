//! Session tick driver.
//!
//! The [`GameEngine`] owns every piece of simulation state and advances it one
//! scheduler step at a time. It never blocks: when the player is due to act,
//! [`GameEngine::step`] returns [`StepOutcome::NeedsIntent`] and the host calls
//! [`GameEngine::submit_intent`] once it has one. NPC turns resolve inside
//! `step` and always cost energy; rejected player intents cost nothing and the
//! player is asked again.

mod digest;
mod errors;
mod floor;
mod stats;
pub mod turns;

pub use digest::state_digest;
pub use errors::EngineError;
pub use floor::floor_description;
pub use stats::{GameOutcome, GameOverReport, GameStats};
pub use turns::{EnergyScheduler, SchedulerState, TurnStep};

use tracing::{debug, info};

use crate::ai::{self, AiContext};
use crate::combat::{self, AttackReport};
use crate::config::GameConfig;
use crate::ecs::{EntityId, Faction, Health, Light, MapDimensions, Position, World};
use crate::events::{EventBus, GameEvent, colors};
use crate::intent::{Intent, PlayerAction};
use crate::inventory::{self, InventoryError};
use crate::map::{self, Dungeon};
use crate::movement;
use crate::rng::GameRng;
use crate::vision::{FieldOfView, LightMap, OpacityGrid};

/// What a call to [`GameEngine::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepOutcome {
    /// Nobody was ready; energy was handed out.
    Accrued,
    /// An NPC took its turn.
    Acted(EntityId),
    /// The player must act; call [`GameEngine::submit_intent`].
    NeedsIntent(EntityId),
    Finished(GameOutcome),
}

/// Screens the host shows without a turn passing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Menu {
    Inventory,
    Help,
}

/// Result of a submitted player intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntentOutcome {
    /// The intent resolved and the player's turn is over.
    Spent,
    /// Nothing changed; the player still holds the turn.
    Rejected,
    /// The host should open a menu; the player still holds the turn.
    Menu(Menu),
}

pub struct GameEngine {
    config: GameConfig,
    world: World,
    events: EventBus,
    rng: GameRng,
    scheduler: EnergyScheduler,
    dungeon: Dungeon,
    opacity: OpacityGrid,
    opacity_dirty: bool,
    fov: FieldOfView,
    lights: LightMap,
    player: EntityId,
    stats: GameStats,
    outcome: Option<GameOutcome>,
}

impl GameEngine {
    /// Starts a session on floor 1.
    ///
    /// The same `config` and `seed` followed by the same intents always
    /// reproduce the same event trace.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, EngineError> {
        let mut rng = GameRng::new(seed);
        let mut world = World::new();
        let player = floor::spawn_player(&mut world, &config.player)?;
        let dungeon = map::generate(
            config.map_width,
            config.map_height,
            &config.digger,
            &config.items,
            &mut rng,
        );
        let dimensions = dungeon.dimensions;

        let mut engine = Self {
            fov: FieldOfView::new(dimensions, config.fov_radius),
            lights: LightMap::new(dimensions),
            opacity: OpacityGrid::open(dimensions),
            opacity_dirty: true,
            config,
            world,
            events: EventBus::new(),
            rng,
            scheduler: EnergyScheduler::new(),
            dungeon,
            player,
            stats: GameStats::new(),
            outcome: None,
        };

        let dungeon = engine.dungeon.clone();
        engine.setup_floor(dungeon, 1)?;
        engine.say("Welcome to the dungeon!", colors::YELLOW);
        info!(seed, %player, "session started");
        Ok(engine)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dungeon.dimensions
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn floor(&self) -> u32 {
        self.stats.floor
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn scheduler(&self) -> &EnergyScheduler {
        &self.scheduler
    }

    /// Event bus, for subscribing listeners.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Takes every event logged since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn fov(&self) -> &FieldOfView {
        &self.fov
    }

    pub fn light_map(&self) -> &LightMap {
        &self.lights
    }

    /// `true` while the player holds the turn and an intent is expected.
    pub fn awaiting_intent(&self) -> bool {
        self.outcome.is_none() && self.scheduler.state() == SchedulerState::Acting(self.player)
    }

    pub fn state_digest(&self) -> [u8; 32] {
        state_digest(&self.world)
    }

    /// Final report, once the game is over.
    pub fn report(&self) -> Option<GameOverReport> {
        self.outcome.map(|outcome| GameOverReport {
            outcome,
            stats: self.stats.clone(),
            digest: self.state_digest(),
        })
    }

    /// Advances the simulation by one scheduler step.
    pub fn step(&mut self) -> StepOutcome {
        if let Some(outcome) = self.outcome {
            return StepOutcome::Finished(outcome);
        }

        match self.scheduler.step(&mut self.world) {
            TurnStep::Accrued => StepOutcome::Accrued,
            TurnStep::Ready(actor) if actor == self.player => {
                self.refresh_vision();
                StepOutcome::NeedsIntent(actor)
            }
            TurnStep::Ready(actor) => {
                self.run_npc(actor);
                StepOutcome::Acted(actor)
            }
        }
    }

    /// Steps until the player must act or the game ends, at most `max_steps` times.
    pub fn run_until_input(&mut self, max_steps: usize) -> StepOutcome {
        let mut last = StepOutcome::Accrued;
        for _ in 0..max_steps {
            last = self.step();
            if matches!(last, StepOutcome::NeedsIntent(_) | StepOutcome::Finished(_)) {
                break;
            }
        }
        last
    }

    /// Applies the player's intent for the pending turn.
    pub fn submit_intent(&mut self, intent: Intent) -> Result<IntentOutcome, EngineError> {
        if self.outcome.is_some() {
            return Err(EngineError::Finished);
        }
        if !self.awaiting_intent() {
            return Err(EngineError::NotAwaitingIntent);
        }

        let outcome = self.apply_player_intent(intent)?;
        debug!(?intent, ?outcome, "player intent resolved");
        if outcome == IntentOutcome::Spent {
            self.stats.turns_survived += 1;
            self.scheduler.complete(&mut self.world, self.player, true);
        }
        Ok(outcome)
    }

    /// Recomputes FOV and lighting if anything marked them dirty.
    pub fn refresh_vision(&mut self) {
        if self.opacity_dirty {
            self.opacity = OpacityGrid::from_world(&self.world, self.dungeon.dimensions);
            self.opacity_dirty = false;
        }
        if let Some(origin) = self.world.position(self.player) {
            self.fov.update(&self.opacity, origin);
        }
        let world = &self.world;
        let lights = world
            .iter::<Light>()
            .filter_map(|(id, light)| world.position(id).map(|position| (position, *light)));
        self.lights.update(&self.opacity, lights);
    }

    fn apply_player_intent(&mut self, intent: Intent) -> Result<IntentOutcome, EngineError> {
        match intent {
            Intent::Move { .. } if !intent.is_cardinal_move() => {
                self.say("You can only move in the four cardinal directions.", colors::GREY);
                Ok(IntentOutcome::Rejected)
            }
            Intent::Move { dx, dy } => self.player_move(dx, dy),
            Intent::Attack { target } => Ok(self.player_attack(target)),
            Intent::Wait => Ok(IntentOutcome::Spent),
            Intent::Action(action) => self.player_action(action),
        }
    }

    fn player_position(&self) -> Result<Position, EngineError> {
        self.world
            .position(self.player)
            .ok_or(EngineError::PlayerMissing(self.player))
    }

    fn player_move(&mut self, dx: i32, dy: i32) -> Result<IntentOutcome, EngineError> {
        let destination = self.player_position()?.offset(dx, dy);

        if let Some(target) = movement::blocker_at(&self.world, destination)
            && self.is_hostile_to_player(target)
        {
            self.melee(self.player, target);
            return Ok(IntentOutcome::Spent);
        }

        let dimensions = self.dungeon.dimensions;
        match movement::try_move(&mut self.world, &mut self.events, dimensions, self.player, dx, dy) {
            Ok(_) => {
                self.fov.mark_dirty();
                self.lights.mark_dirty();
                Ok(IntentOutcome::Spent)
            }
            Err(err) => {
                debug!(%err, "player move rejected");
                Ok(IntentOutcome::Rejected)
            }
        }
    }

    fn player_attack(&mut self, target: EntityId) -> IntentOutcome {
        let adjacent = match (self.world.position(self.player), self.world.position(target)) {
            (Some(from), Some(to)) => from.manhattan(to) == 1,
            _ => false,
        };
        if !adjacent || !self.is_hostile_to_player(target) {
            return IntentOutcome::Rejected;
        }
        self.melee(self.player, target);
        IntentOutcome::Spent
    }

    fn player_action(&mut self, action: PlayerAction) -> Result<IntentOutcome, EngineError> {
        match action {
            PlayerAction::Pickup => {
                match inventory::try_pickup(&mut self.world, &mut self.events, self.player) {
                    Ok(_) => {
                        self.stats.items_collected += 1;
                        Ok(IntentOutcome::Spent)
                    }
                    Err(err) => self.reject_item_action(err),
                }
            }
            PlayerAction::UseItem { index } => {
                match inventory::use_slot(&mut self.world, &mut self.events, self.player, index) {
                    Ok(_) => Ok(IntentOutcome::Spent),
                    Err(err) => self.reject_item_action(err),
                }
            }
            PlayerAction::Inventory => Ok(IntentOutcome::Menu(Menu::Inventory)),
            PlayerAction::Help => Ok(IntentOutcome::Menu(Menu::Help)),
            PlayerAction::Ascend => {
                self.say("There is no way back up.", colors::RED);
                Ok(IntentOutcome::Rejected)
            }
            PlayerAction::Descend => {
                if self.player_position()? != self.dungeon.stairs_down {
                    self.say("There are no stairs here.", colors::RED);
                    return Ok(IntentOutcome::Rejected);
                }
                self.descend()?;
                Ok(IntentOutcome::Spent)
            }
        }
    }

    fn reject_item_action(&mut self, err: InventoryError) -> Result<IntentOutcome, EngineError> {
        let text = match err {
            InventoryError::NothingHere(_) => "There is nothing here to pick up.",
            InventoryError::Full(_) => "Your inventory is full.",
            InventoryError::InvalidSlot { .. } => "You have no item in that slot.",
            InventoryError::NotUsable(_) => "You cannot use that.",
            InventoryError::NoInventory(_) | InventoryError::Store(_) => {
                return Err(EngineError::PlayerMissing(self.player));
            }
        };
        debug!(%err, "item action rejected");
        self.say(text, colors::RED);
        Ok(IntentOutcome::Rejected)
    }

    fn is_hostile_to_player(&self, target: EntityId) -> bool {
        target != self.player
            && self.world.has::<Health>(target)
            && self
                .world
                .get::<Faction>(target)
                .is_some_and(|faction| Faction::Player.is_hostile_to(*faction))
    }

    fn run_npc(&mut self, actor: EntityId) {
        let intent = {
            let ctx = AiContext::new(&self.world, self.dungeon.dimensions);
            ai::decide(&ctx, &mut self.rng, actor)
        };

        match intent {
            Intent::Move { dx, dy } => {
                let dimensions = self.dungeon.dimensions;
                if let Err(err) =
                    movement::try_move(&mut self.world, &mut self.events, dimensions, actor, dx, dy)
                {
                    debug!(%actor, %err, "npc move rejected");
                }
            }
            Intent::Attack { target } => {
                self.melee(actor, target);
            }
            Intent::Wait | Intent::Action(_) => {}
        }

        self.scheduler.complete(&mut self.world, actor, true);
    }

    /// Resolves one attack and books kills.
    fn melee(&mut self, attacker: EntityId, target: EntityId) -> Option<AttackReport> {
        let attacker_name = self.world.name_or(attacker, "something").to_owned();
        let report = combat::resolve_attack(
            &mut self.world,
            &mut self.events,
            &mut self.rng,
            attacker,
            target,
        )?;

        if report.killed {
            if attacker == self.player {
                self.stats.enemies_killed += 1;
            }
            if target == self.player {
                self.stats.last_killer = Some(attacker_name);
                self.say("You have died!", colors::DARK_RED);
                self.finish(GameOutcome::Defeat);
            }
        }
        Some(report)
    }

    fn descend(&mut self) -> Result<(), EngineError> {
        self.events.push(GameEvent::Descend { who: self.player });

        let current = self.stats.floor;
        if current >= self.config.final_floor {
            self.stats.victory = true;
            self.say("Congratulations! You have conquered the dungeon!", colors::GOLD);
            self.finish(GameOutcome::Victory);
            return Ok(());
        }

        self.say("You descend deeper into the dungeon...", colors::GREEN);
        let dungeon = map::generate(
            self.config.map_width,
            self.config.map_height,
            &self.config.digger,
            &self.config.items,
            &mut self.rng,
        );
        self.setup_floor(dungeon, current + 1)?;

        let healed = self
            .world
            .try_get_mut::<Health>(self.player)?
            .heal(self.config.player.descend_heal);
        if healed > 0 {
            self.events.push(GameEvent::Healed {
                who: self.player,
                amount: healed,
            });
            self.say(
                format!("You feel slightly refreshed (+{healed} HP)."),
                colors::GREEN,
            );
        }
        Ok(())
    }

    /// Replaces the level with `dungeon` and repopulates it.
    fn setup_floor(&mut self, dungeon: Dungeon, floor: u32) -> Result<(), EngineError> {
        let removed = floor::clear_level(&mut self.world, self.player);
        map::populate(&mut self.world, &dungeon)?;
        floor::place_player(&mut self.world, self.player, dungeon.player_start)?;

        let enemies = floor::spawn_enemies(&mut self.world, dungeon.dimensions, floor, &mut self.rng)?;
        let items = floor::spawn_items(&mut self.world, &dungeon, &self.config, &mut self.rng)?;
        if floor == self.config.final_floor {
            floor::spawn_boss(&mut self.world, &dungeon, &mut self.rng)?;
        }

        self.fov.clear_memory(dungeon.dimensions);
        self.lights.reset(dungeon.dimensions);
        self.opacity_dirty = true;
        self.scheduler.reset();
        self.dungeon = dungeon;
        self.stats.floor = floor;

        self.events.push(GameEvent::FloorChanged { floor });
        self.say(
            format!(
                "Floor {floor} - {}",
                floor_description(floor, self.config.final_floor)
            ),
            colors::YELLOW,
        );
        info!(floor, removed, enemies, items, "floor ready");
        Ok(())
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.outcome = Some(outcome);
        info!(
            ?outcome,
            floor = self.stats.floor,
            kills = self.stats.enemies_killed,
            turns = self.stats.turns_survived,
            "game over"
        );
    }

    fn say(&mut self, text: impl Into<String>, color: u32) {
        self.events.push(GameEvent::message(text, color));
    }
}
