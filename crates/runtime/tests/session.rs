use game_core::{GameConfig, GameOutcome, Intent, Menu, PlayerAction};
use runtime::{
    AutoPilotProvider, Event, Runtime, RuntimeConfig, RuntimeError, ScriptedProvider, Topic,
    TurnEvent, WaitIntentProvider,
};

fn short_game(seed: u64) -> RuntimeConfig {
    let mut game_config = GameConfig::new().with_map_size(40, 30);
    game_config.final_floor = 2;
    RuntimeConfig {
        game_config,
        seed: Some(seed),
        event_buffer_size: 1 << 16,
        max_steps: 2_000_000,
    }
}

#[test]
fn builder_requires_a_provider() {
    let result = Runtime::builder().config(short_game(1)).build();
    assert!(matches!(result, Err(RuntimeError::ProviderNotSet)));
}

#[tokio::test]
async fn autopilot_session_finishes() {
    let mut runtime = Runtime::builder()
        .config(short_game(8))
        .player_provider(AutoPilotProvider::new())
        .build()
        .unwrap();

    let summary = runtime.run().await.unwrap();
    assert_eq!(summary.seed, 8);
    assert!(runtime.engine().is_finished());
    match summary.report.outcome {
        GameOutcome::Victory => {
            assert!(summary.report.stats.victory);
            assert!(summary.death.is_none());
        }
        GameOutcome::Defeat => {
            let death = summary.death.as_ref().unwrap();
            assert!(!death.message.is_empty());
        }
    }
    assert_eq!(summary.digest_hex().len(), 64);
}

#[tokio::test]
async fn equal_seeds_give_equal_sessions() {
    let mut first = Runtime::builder()
        .config(short_game(77))
        .player_provider(AutoPilotProvider::new())
        .build()
        .unwrap();
    let mut second = Runtime::builder()
        .config(short_game(77))
        .player_provider(AutoPilotProvider::new())
        .build()
        .unwrap();

    let a = first.run().await.unwrap();
    let b = second.run().await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn subscribers_receive_player_turns() {
    let mut runtime = Runtime::builder()
        .config(short_game(3))
        .player_provider(WaitIntentProvider)
        .build()
        .unwrap();
    let mut game = runtime.subscribe(Topic::Game);
    let mut turns = runtime.subscribe(Topic::Turn);

    while runtime.engine().stats().turns_survived < 3 && !runtime.engine().is_finished() {
        runtime.step().await.unwrap();
    }

    let mut player_turns = 0;
    while let Ok(event) = turns.try_recv() {
        if let Event::Turn(TurnEvent::PlayerTurn { floor, .. }) = event {
            assert_eq!(floor, 1);
            player_turns += 1;
        }
    }
    assert!(player_turns >= 3);

    while let Ok(event) = game.try_recv() {
        assert_eq!(event.topic(), Topic::Game);
    }
}

#[tokio::test]
async fn menus_are_published_and_cost_nothing() {
    let script = vec![
        Intent::Action(PlayerAction::Inventory),
        Intent::Action(PlayerAction::Help),
        Intent::Wait,
    ];
    let mut runtime = Runtime::builder()
        .config(short_game(5))
        .player_provider(ScriptedProvider::new(script))
        .build()
        .unwrap();
    let mut turns = runtime.subscribe(Topic::Turn);

    while runtime.engine().stats().turns_survived < 1 {
        runtime.step().await.unwrap();
    }

    let mut menus = Vec::new();
    while let Ok(event) = turns.try_recv() {
        if let Event::Turn(TurnEvent::MenuRequested(menu)) = event {
            menus.push(menu);
        }
    }
    assert_eq!(menus, vec![Menu::Inventory, Menu::Help]);
}

#[tokio::test]
async fn step_limit_is_enforced() {
    let mut config = short_game(9);
    config.max_steps = 4;
    let mut runtime = Runtime::builder()
        .config(config)
        .player_provider(WaitIntentProvider)
        .build()
        .unwrap();

    let err = runtime.run().await.unwrap_err();
    assert!(matches!(err, RuntimeError::StepLimit { limit: 4 }));
}

#[tokio::test]
async fn summary_serializes_to_json() {
    let mut runtime = Runtime::builder()
        .config(short_game(8))
        .player_provider(AutoPilotProvider::new())
        .build()
        .unwrap();
    let summary = runtime.run().await.unwrap();

    let json = serde_json::to_string(&summary).unwrap();
    let back: runtime::SessionSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back, summary);
}
