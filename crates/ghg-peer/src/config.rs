//! Participant configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, `GHG_*`
//! environment variables, an optional TOML file, then command-line flags
//! (applied by the binary).

use std::path::{Path, PathBuf};

use ghg_game::{
    parse_custom_topics, validate_target_score, GameError, RoomSettings, TopicMode,
    DEFAULT_TARGET_SCORE,
};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    TopicMode(String),

    #[error(transparent)]
    Settings(#[from] GameError),
}

/// Settings for one participant and, when hosting, its room.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Display name shown to the other players.
    pub player_name: String,
    /// `standard`, `custom` or `hybrid`.
    pub topic_mode: String,
    pub custom_topics: Vec<String>,
    /// Newline-separated prompts appended to `custom_topics`.
    pub custom_topics_file: Option<PathBuf>,
    pub target_score: u32,
    /// Fixed RNG seed for repeatable rooms.
    pub seed: Option<u64>,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            player_name: std::env::var("GHG_PLAYER_NAME").unwrap_or_else(|_| "Host".into()),
            topic_mode: std::env::var("GHG_TOPIC_MODE").unwrap_or_else(|_| "standard".into()),
            // Environment prompts are separated by `;` since newlines are awkward there.
            custom_topics: std::env::var("GHG_CUSTOM_TOPICS")
                .map(|raw| parse_custom_topics(&raw.replace(';', "\n")))
                .unwrap_or_default(),
            custom_topics_file: None,
            target_score: std::env::var("GHG_TARGET_SCORE")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_TARGET_SCORE),
            seed: std::env::var("GHG_SEED")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
        }
    }
}

impl PeerConfig {
    /// Load a TOML file. Keys it omits keep their environment/default value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn topic_mode(&self) -> Result<TopicMode, ConfigError> {
        self.topic_mode.parse().map_err(ConfigError::TopicMode)
    }

    /// Validated room settings for hosting.
    pub fn room_settings(&self) -> Result<RoomSettings, ConfigError> {
        let mut custom_topics = parse_custom_topics(&self.custom_topics.join("\n"));
        if let Some(path) = &self.custom_topics_file {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            custom_topics.extend(parse_custom_topics(&text));
        }

        Ok(RoomSettings {
            topic_mode: self.topic_mode()?,
            custom_topics,
            target_score: validate_target_score(self.target_score)?,
        })
    }
}
