//! Client configuration.

use crate::cli::Overrides;
use derive_getters::Getters;
use derive_more::{Display, Error};
use hockey_core::{
    BoardConfig, BoardConfigError, GameSession, MoveSelector, RandomSelector, Strategy,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Move strategy selectable from config or command line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Funnel table, then the closest safe neighbour.
    #[default]
    Heuristic,
    /// A random safe neighbour.
    Random,
}

/// Configuration for the hockey client.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Player name; a random one is drawn when absent.
    #[serde(default)]
    name: Option<String>,

    /// Server host.
    #[serde(default = "default_host")]
    host: String,

    /// Server port.
    #[serde(default = "default_port")]
    port: u16,

    /// Move strategy.
    #[serde(default)]
    strategy: StrategyKind,

    /// Seed for the random strategy.
    #[serde(default)]
    seed: Option<u64>,

    /// Board geometry.
    #[serde(default)]
    board: BoardConfig,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8023
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: None,
            host: default_host(),
            port: default_port(),
            strategy: StrategyKind::default(),
            seed: None,
            board: BoardConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Applies command-line overrides on top of this configuration.
    #[instrument(skip_all)]
    pub fn merge(mut self, overrides: &Overrides) -> Self {
        if let Some(host) = &overrides.host {
            self.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(name) = &overrides.name {
            self.name = Some(name.clone());
        }
        if let Some(size) = overrides.board_size {
            self.board = BoardConfig::new(size, *self.board.mouth_half_width());
        }
        if let Some(strategy) = overrides.strategy {
            self.strategy = strategy;
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        self
    }

    /// Server address as `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the configured name, or draws a random `Kek<n>` name.
    pub fn resolve_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => {
                let name = format!("Kek{}", rand::thread_rng().gen_range(0..1000));
                info!(%name, "No name configured, drew a random one");
                name
            }
        }
    }

    /// Builds a session for `name` with the configured board and strategy.
    #[instrument(skip(self), fields(strategy = ?self.strategy))]
    pub fn build_session(&self, name: &str) -> Result<GameSession, BoardConfigError> {
        let strategy: Box<dyn Strategy> = match self.strategy {
            StrategyKind::Heuristic => Box::new(MoveSelector::new()),
            StrategyKind::Random => Box::new(match self.seed {
                Some(seed) => RandomSelector::seeded(seed),
                None => RandomSelector::new(),
            }),
        };
        Ok(GameSession::new(name, self.board)?.with_strategy(strategy))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
