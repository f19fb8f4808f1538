use std::collections::HashSet;

use game_core::{
    Actor, Blocks, CardinalDirection, EnergyScheduler, GameConfig, GameEngine, GameEvent, Intent,
    IntentOutcome, PlayerAction, Position, StepOutcome,
};

const SCRIPT: [Intent; 8] = [
    Intent::step(CardinalDirection::East),
    Intent::step(CardinalDirection::East),
    Intent::step(CardinalDirection::South),
    Intent::Action(PlayerAction::Pickup),
    Intent::step(CardinalDirection::West),
    Intent::Wait,
    Intent::step(CardinalDirection::North),
    Intent::Action(PlayerAction::Descend),
];

fn config() -> GameConfig {
    GameConfig::new().with_map_size(50, 30)
}

/// Plays the script for `turns` player turns, returning the full event trace.
fn play(seed: u64, turns: usize) -> (Vec<GameEvent>, [u8; 32]) {
    let mut engine = GameEngine::new(config(), seed).unwrap();
    let mut trace = engine.drain_events();

    for turn in 0..turns {
        match engine.run_until_input(100_000) {
            StepOutcome::NeedsIntent(_) => {}
            _ => break,
        }
        let intent = SCRIPT[turn % SCRIPT.len()];
        if engine.submit_intent(intent).unwrap() != IntentOutcome::Spent {
            engine.submit_intent(Intent::Wait).unwrap();
        }
        trace.extend(engine.drain_events());
    }
    (trace, engine.state_digest())
}

#[test]
fn same_seed_same_trace() {
    let (left_trace, left_digest) = play(1234, 60);
    let (right_trace, right_digest) = play(1234, 60);

    assert!(!left_trace.is_empty());
    assert_eq!(left_trace, right_trace);
    assert_eq!(left_digest, right_digest);
}

#[test]
fn different_seeds_diverge() {
    let (_, left) = play(1, 10);
    let (_, right) = play(2, 10);
    assert_ne!(left, right);
}

#[test]
fn blockers_never_share_a_cell_and_only_ready_actors_act() {
    let mut engine = GameEngine::new(config(), 77).unwrap();

    for turn in 0..2_000 {
        let ready = EnergyScheduler::select_ready(engine.world());
        let before: Vec<(game_core::EntityId, u32)> = engine
            .world()
            .iter::<Actor>()
            .map(|(id, actor)| (id, actor.energy))
            .collect();

        match engine.step() {
            StepOutcome::Finished(_) => break,
            StepOutcome::NeedsIntent(_) => {
                let intent = SCRIPT[turn % SCRIPT.len()];
                if engine.submit_intent(intent).unwrap() != IntentOutcome::Spent {
                    engine.submit_intent(Intent::Wait).unwrap();
                }
            }
            StepOutcome::Acted(actor) => {
                assert_eq!(ready, Some(actor));
                let energy = before
                    .iter()
                    .find(|(id, _)| *id == actor)
                    .map(|(_, energy)| *energy)
                    .unwrap();
                assert!(energy >= GameConfig::ENERGY_THRESHOLD);
            }
            StepOutcome::Accrued => assert_eq!(ready, None),
        }

        let world = engine.world();
        let mut occupied: HashSet<Position> = HashSet::new();
        for (id, _) in world.iter::<Blocks>() {
            if let Some(position) = world.position(id) {
                assert!(occupied.insert(position), "two blockers on {position}");
            }
        }
    }
}
