use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backgammon::Color;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("perspective must be White or Black")]
    NeutralPerspective,
}

/// Settings for a batch of self-play games. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub games: u32,
    /// Game `i` uses `seed + i`.
    pub seed: u64,
    /// Actions (moves, bear-offs and passes) after which a game is abandoned.
    pub max_plies: u32,
    /// Side whose results feed the statistics.
    pub perspective: Color,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            games: 1000,
            seed: 0x5EED,
            max_plies: 2000,
            perspective: Color::Black,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(path, &text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.perspective.is_player() {
            Ok(())
        } else {
            Err(ConfigError::NeutralPerspective)
        }
    }
}
