//! Session narration layered on top of simulation events.
//!
//! The narrator owns its own [`GameRng`] stream derived from the session
//! seed, so narration is reproducible without perturbing the simulation.

use game_content::{
    DeathContext, DeathReport, ambient_line, compose_death_report, floor_ambient_line,
    floor_theme, low_health_line,
};
use game_core::{EntityId, GameConfig, GameEvent, GameRng, GameStats, Health, World, colors};

/// Mixed into the session seed so narration draws from a separate stream.
const NARRATOR_SALT: u64 = 0x6E61_7272_6174_6F72;

const AMBIENT_MIN_TURNS: u32 = 15;
const AMBIENT_MAX_TURNS: u32 = 35;
const AMBIENT_GENERAL_CHANCE: f32 = 0.7;
const AMBIENT_GREY: u32 = 0x888888;
const WARNING_RED: u32 = 0xFF6666;

#[derive(Clone, Debug)]
pub struct Narrator {
    rng: GameRng,
    floor: u32,
    low_health_warned: bool,
    turns_until_ambient: u32,
}

impl Narrator {
    pub fn new(seed: u64) -> Self {
        let mut rng = GameRng::new(seed ^ NARRATOR_SALT);
        let turns_until_ambient = rng.range(AMBIENT_MIN_TURNS, AMBIENT_MAX_TURNS);
        Self {
            rng,
            floor: 1,
            low_health_warned: false,
            turns_until_ambient,
        }
    }

    /// Narration triggered by one simulation event.
    pub fn observe(&mut self, event: &GameEvent) -> Option<GameEvent> {
        match event {
            GameEvent::FloorChanged { floor } => {
                self.floor = *floor;
                let theme = floor_theme(*floor);
                tracing::debug!(floor, theme = theme.name, "entering themed floor");
                Some(GameEvent::message(theme.enter_message, colors::YELLOW))
            }
            _ => None,
        }
    }

    /// Checks the player's condition after a resolved player turn.
    ///
    /// Emits a low-health warning once each time hp drops below the flee
    /// threshold, and an ambient line every few turns.
    pub fn after_player_turn(&mut self, world: &World, player: EntityId) -> Vec<GameEvent> {
        let mut lines = Vec::new();

        let hurt = world.get::<Health>(player).is_some_and(|health| {
            health.hp > 0 && health.hp * 100 < health.max * GameConfig::FLEE_HEALTH_PERCENT
        });
        if hurt && !self.low_health_warned {
            lines.push(GameEvent::message(
                low_health_line(&mut self.rng),
                WARNING_RED,
            ));
        }
        self.low_health_warned = hurt;

        self.turns_until_ambient = self.turns_until_ambient.saturating_sub(1);
        if self.turns_until_ambient == 0 {
            self.turns_until_ambient = self.rng.range(AMBIENT_MIN_TURNS, AMBIENT_MAX_TURNS);
            let text = if self.rng.chance(AMBIENT_GENERAL_CHANCE) {
                ambient_line(self.floor, &mut self.rng)
            } else {
                floor_ambient_line(self.floor, &mut self.rng)
            };
            if let Some(text) = text {
                lines.push(GameEvent::message(text, AMBIENT_GREY));
            }
        }
        lines
    }

    pub fn death_report(&mut self, stats: &GameStats) -> DeathReport {
        let context = DeathContext {
            killer: stats.last_killer.clone(),
            floor: stats.floor,
            turns_alive: stats.turns_survived,
            enemies_killed: stats.enemies_killed,
        };
        compose_death_report(&context, &mut self.rng)
    }
}
