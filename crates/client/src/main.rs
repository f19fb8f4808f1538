//! Headless dungeon client.
//!
//! Builds a [`runtime::Runtime`] driven by the autopilot, plays one session to
//! the end and prints the report.
//!
//! ```bash
//! dungeon --seed 42 --messages
//! RUST_LOG=debug dungeon --config dungeon.toml --json
//! ```
mod config;
mod logging;
mod report;

use anyhow::Result;
use clap::Parser;
use game_core::GameEvent;
use runtime::{AutoPilotProvider, Event, Runtime, Topic};
use tokio::sync::broadcast::error::RecvError;

use crate::config::{Args, ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_args(Args::parse())?;
    logging::setup_logging()?;

    let mut runtime = Runtime::builder()
        .config(config.runtime.clone())
        .player_provider(AutoPilotProvider::new())
        .build()?;
    tracing::info!(seed = runtime.seed(), "Starting dungeon session");

    let echo = config
        .echo_messages
        .then(|| tokio::spawn(echo_messages(runtime.subscribe(Topic::Game))));

    let summary = runtime.run().await?;
    drop(runtime);
    if let Some(handle) = echo {
        handle.await?;
    }

    if config.json {
        println!("{}", report::render_json(&summary)?);
    } else {
        println!("{}", report::render_text(&summary));
    }
    Ok(())
}

/// Prints message-log lines until the runtime goes away.
async fn echo_messages(mut rx: tokio::sync::broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(Event::Game(GameEvent::Message { text, .. })) => eprintln!("{text}"),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "message echo fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
