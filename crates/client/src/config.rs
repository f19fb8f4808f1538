//! Command-line and environment configuration for the headless client.
use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use game_content::ConfigLoader;
use game_core::GameConfig;
use runtime::RuntimeConfig;

/// Play a dungeon session with the autopilot and print the final report.
#[derive(Debug, Clone, Parser)]
#[command(name = "dungeon", version, about)]
pub struct Args {
    /// Session seed; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file overriding the default game configuration.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Scheduler steps before the session is abandoned.
    #[arg(long, value_name = "N")]
    pub max_turns: Option<u64>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Echo the game message log to stderr while playing.
    #[arg(long)]
    pub messages: bool,
}

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
    pub json: bool,
    pub echo_messages: bool,
}

impl ClientConfig {
    /// Merges command-line arguments over environment variables.
    ///
    /// Environment variables:
    /// - `DUNGEON_SEED` - Session seed (default: random)
    /// - `DUNGEON_CONFIG` - Path to a TOML game config
    /// - `DUNGEON_MAX_TURNS` - Scheduler step limit
    /// - `DUNGEON_EVENT_BUFFER` - Broadcast channel capacity (default: 1024)
    pub fn from_args(args: Args) -> Result<Self> {
        let config_path = args
            .config
            .or_else(|| env::var("DUNGEON_CONFIG").ok().map(PathBuf::from));
        let game_config = match config_path {
            Some(path) => ConfigLoader::load(&path)?,
            None => GameConfig::default(),
        };

        let mut runtime = RuntimeConfig {
            game_config,
            seed: args.seed.or_else(|| read_env("DUNGEON_SEED")),
            ..RuntimeConfig::default()
        };
        if let Some(limit) = args.max_turns.or_else(|| read_env("DUNGEON_MAX_TURNS")) {
            runtime.max_steps = limit.max(1);
        }
        if let Some(capacity) = read_env::<usize>("DUNGEON_EVENT_BUFFER") {
            runtime.event_buffer_size = capacity.max(1);
        }

        Ok(Self {
            runtime,
            json: args.json,
            echo_messages: args.messages,
        })
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::parse_from(["dungeon", "--seed", "42", "--max-turns", "500", "--json"]);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.max_turns, Some(500));
        assert!(args.json);
        assert!(!args.messages);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "final_floor = 3").unwrap();
        let args = Args::parse_from([
            "dungeon".to_owned(),
            "--seed".to_owned(),
            "7".to_owned(),
            "--config".to_owned(),
            file.path().display().to_string(),
        ]);

        let config = ClientConfig::from_args(args).unwrap();
        assert_eq!(config.runtime.seed, Some(7));
        assert_eq!(config.runtime.game_config.final_floor, 3);
        assert_eq!(
            config.runtime.game_config.map_width,
            GameConfig::DEFAULT_MAP_WIDTH
        );
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args::parse_from(["dungeon", "--config", "/nonexistent/dungeon.toml"]);
        assert!(ClientConfig::from_args(args).is_err());
    }
}
