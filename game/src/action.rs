//! Player intents that drive the state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::{PlayerId, Team, TopicMode};

/// Everything that can change the game state.
///
/// Serialized with an inline `type` tag so an action can be flattened into
/// the `ClientAction` wire payload next to the sender id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Action {
    /// Accepted join request.
    AddPlayer { player_id: PlayerId, name: String },
    /// Player left or their connection closed.
    RemovePlayer { player_id: PlayerId },
    /// Host picks the score needed to win.
    SetTargetScore { target_score: u32 },
    /// Host picks where prompts come from.
    ConfigureTopics {
        topic_mode: TopicMode,
        custom_topics: Vec<String>,
    },
    StartGame,
    AdvancePhase,
    RollDice,
    ChangeTopic,
    SelectWinner { team: Team },
    RestartGame,
    /// One second of debate time elapsed.
    Tick,
}

impl Action {
    /// Stable name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddPlayer { .. } => "AddPlayer",
            Self::RemovePlayer { .. } => "RemovePlayer",
            Self::SetTargetScore { .. } => "SetTargetScore",
            Self::ConfigureTopics { .. } => "ConfigureTopics",
            Self::StartGame => "StartGame",
            Self::AdvancePhase => "AdvancePhase",
            Self::RollDice => "RollDice",
            Self::ChangeTopic => "ChangeTopic",
            Self::SelectWinner { .. } => "SelectWinner",
            Self::RestartGame => "RestartGame",
            Self::Tick => "Tick",
        }
    }

    /// Actions the round's judge drives. A judge may apply these locally
    /// before the host confirms them.
    pub fn is_judge_gated(&self) -> bool {
        matches!(
            self,
            Self::RollDice | Self::ChangeTopic | Self::SelectWinner { .. } | Self::AdvancePhase
        )
    }

    /// Actions only the host itself originates (roster bookkeeping and the
    /// debate clock). Clients never send these.
    pub fn is_host_internal(&self) -> bool {
        matches!(
            self,
            Self::AddPlayer { .. } | Self::RemovePlayer { .. } | Self::Tick
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddPlayer { player_id, name } => write!(f, "AddPlayer({player_id}, {name})"),
            Self::RemovePlayer { player_id } => write!(f, "RemovePlayer({player_id})"),
            Self::SetTargetScore { target_score } => write!(f, "SetTargetScore({target_score})"),
            Self::ConfigureTopics {
                topic_mode,
                custom_topics,
            } => write!(
                f,
                "ConfigureTopics({topic_mode}, {} custom)",
                custom_topics.len()
            ),
            Self::SelectWinner { team } => write!(f, "SelectWinner({team})"),
            other => f.write_str(other.name()),
        }
    }
}
