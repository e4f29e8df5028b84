/// Configuration for session generation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Most bot opponents a session can field.
pub const MAX_BOT_ENEMIES: usize = 2;

/// Immutable input to one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Whether hirelings are drawn at all.
    pub use_hirelings: bool,
    /// Whether landmarks are drawn at all.
    pub use_landmarks: bool,
    /// Number of bot opponents (1-2).
    pub bot_enemies: usize,
    /// Number of human players. Recorded only; one player faction is drawn.
    pub players: usize,
    /// RNG seed used by `SessionGenerator::generate_seeded`.
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            use_hirelings: true,
            use_landmarks: true,
            bot_enemies: MAX_BOT_ENEMIES,
            players: 1,
            seed: 42,
        }
    }
}

impl GenerationConfig {
    /// Load a config from a RON file. Missing fields take their defaults.
    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<Self, ConfigError> {
        let mut config: GenerationConfig = ron::from_str(input)?;
        config.bot_enemies = config.bot_enemies.clamp(1, MAX_BOT_ENEMIES);
        Ok(config)
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of bot opponents (clamped to 1-2).
    pub fn with_bot_enemies(mut self, bots: usize) -> Self {
        self.bot_enemies = bots.clamp(1, MAX_BOT_ENEMIES);
        self
    }

    pub fn with_hirelings(mut self, enabled: bool) -> Self {
        self.use_hirelings = enabled;
        self
    }

    pub fn with_landmarks(mut self, enabled: bool) -> Self {
        self.use_landmarks = enabled;
        self
    }

    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players.max(1);
        self
    }
}
