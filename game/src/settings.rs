//! Room settings chosen by the host before the game starts.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::{GameError, GameResult};
use crate::state::{GameState, TopicMode, DEFAULT_TARGET_SCORE, TARGET_SCORE_OPTIONS};

/// Custom prompts must be longer than this many characters.
pub const MIN_CUSTOM_TOPIC_LEN: usize = 5;

/// Split newline-separated custom prompts, trimming each line and dropping
/// blank or too-short entries.
pub fn parse_custom_topics(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|t| t.chars().count() > MIN_CUSTOM_TOPIC_LEN)
        .map(str::to_string)
        .collect()
}

/// Check a target score against the options offered in the lobby.
pub fn validate_target_score(score: u32) -> GameResult<u32> {
    if TARGET_SCORE_OPTIONS.contains(&score) {
        Ok(score)
    } else {
        Err(GameError::InvalidTargetScore(score))
    }
}

/// Everything the host configures when creating a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSettings {
    pub topic_mode: TopicMode,
    pub custom_topics: Vec<String>,
    pub target_score: u32,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            topic_mode: TopicMode::Standard,
            custom_topics: Vec::new(),
            target_score: DEFAULT_TARGET_SCORE,
        }
    }
}

impl RoomSettings {
    /// Build settings from raw UI input.
    pub fn from_input(
        topic_mode: TopicMode,
        custom_topics_text: &str,
        target_score: u32,
    ) -> GameResult<Self> {
        Ok(Self {
            topic_mode,
            custom_topics: parse_custom_topics(custom_topics_text),
            target_score: validate_target_score(target_score)?,
        })
    }

    /// Empty lobby state carrying these settings.
    pub fn initial_state(&self) -> GameState {
        GameState {
            target_score: self.target_score,
            ..GameState::new(self.topic_mode, self.custom_topics.clone())
        }
    }

    /// Actions that apply these settings to an existing lobby.
    pub fn as_actions(&self) -> [Action; 2] {
        [
            Action::ConfigureTopics {
                topic_mode: self.topic_mode,
                custom_topics: self.custom_topics.clone(),
            },
            Action::SetTargetScore {
                target_score: self.target_score,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_custom_topics_trims_and_filters() {
        let parsed = parse_custom_topics("  Cereal is soup  \n\nshort\n12345\n123456\n   \nHot dogs are sandwiches");
        assert_eq!(
            parsed,
            vec![
                "Cereal is soup".to_string(),
                "123456".to_string(),
                "Hot dogs are sandwiches".to_string(),
            ]
        );
    }

    #[test]
    fn test_target_score_options() {
        assert_eq!(validate_target_score(7), Ok(7));
        assert_eq!(
            validate_target_score(4),
            Err(GameError::InvalidTargetScore(4))
        );
    }

    #[test]
    fn test_initial_state_carries_settings() {
        let settings =
            RoomSettings::from_input(TopicMode::Custom, "Tabs are better than spaces", 3).unwrap();
        let state = settings.initial_state();
        assert_eq!(state.target_score, 3);
        assert_eq!(state.topic_mode, TopicMode::Custom);
        assert_eq!(state.custom_topics.len(), 1);
        assert!(state.players.is_empty());
    }

    #[test]
    fn test_default_settings() {
        let settings = RoomSettings::default();
        assert_eq!(settings.target_score, DEFAULT_TARGET_SCORE);
        assert_eq!(settings.topic_mode, TopicMode::Standard);
    }
}
