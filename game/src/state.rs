//! Replicated game state: players, phases, roles and scoring fields.
//!
//! `GameState` is the single object every participant holds a full copy of.
//! The host's copy is authoritative; everyone else renders whatever snapshot
//! arrived last. Field names serialize in camelCase because the snapshot is
//! the wire payload of `JoinAccepted` and `SyncState`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque player identity, generated by the joining client.
pub type PlayerId = String;

/// Hard cap on room size.
pub const MAX_PLAYERS: usize = 8;

/// Minimum roster needed to start a game (one judge plus two debaters).
pub const MIN_PLAYERS: usize = 3;

/// Maximum player name length, in characters, after trimming.
pub const MAX_NAME_LEN: usize = 24;

/// Length of a debate, in seconds.
pub const DEBATE_SECONDS: u32 = 60;

/// Target score used when the host does not pick one.
pub const DEFAULT_TARGET_SCORE: u32 = 5;

/// Target scores offered to the host in the lobby.
pub const TARGET_SCORE_OPTIONS: [u32; 4] = [3, 5, 7, 10];

/// Game phases, in the only order the state machine can reach them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Waiting for players; host configures the room.
    Lobby,
    /// Roles for the round are revealed.
    Roles,
    /// Debate prompt is revealed; the judge may reroll it.
    Topic,
    /// Judge rolls the judging criterion.
    Dice,
    /// Timed debate between the two teams.
    Debate,
    /// Judge picks the winning team.
    Sentence,
    /// Round scores are shown.
    Results,
    /// Someone reached the target score. Terminal until restart.
    Gameover,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Roles => write!(f, "roles"),
            Self::Topic => write!(f, "topic"),
            Self::Dice => write!(f, "dice"),
            Self::Debate => write!(f, "debate"),
            Self::Sentence => write!(f, "sentence"),
            Self::Results => write!(f, "results"),
            Self::Gameover => write!(f, "gameover"),
        }
    }
}

/// Judging axis for a round, chosen by the dice roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    Logic,
    Speed,
    Satire,
}

impl Criterion {
    /// All faces of the die.
    pub const ALL: [Criterion; 3] = [Criterion::Logic, Criterion::Speed, Criterion::Satire];
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logic => write!(f, "Logic"),
            Self::Speed => write!(f, "Speed"),
            Self::Satire => write!(f, "Satire"),
        }
    }
}

/// One of the two debating sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Accusers,
    Defenders,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accusers => write!(f, "accusers"),
            Self::Defenders => write!(f, "defenders"),
        }
    }
}

/// A player's role in the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Judge,
    Accuser,
    Defender,
}

/// Where debate prompts come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicMode {
    /// Built-in prompt list only.
    #[default]
    Standard,
    /// The room's custom list only.
    Custom,
    /// Coin flip between the two.
    Hybrid,
}

impl fmt::Display for TopicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Custom => write!(f, "custom"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl std::str::FromStr for TopicMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "custom" => Ok(Self::Custom),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(format!(
                "unknown topic mode '{other}' (expected standard, custom or hybrid)"
            )),
        }
    }
}

/// A participant in the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub is_host: bool,
}

impl Player {
    /// Create a player with zero score. Host flag is decided by the state machine.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            score: 0,
            is_host: false,
        }
    }

    /// Fresh random player id (UUID v4).
    pub fn generate_id() -> PlayerId {
        uuid::Uuid::new_v4().to_string()
    }
}

/// The full replicated game snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub phase: Phase,
    /// Join order is preserved; it is also the tie-break order for wins.
    pub players: Vec<Player>,
    pub current_round: u32,
    /// Empty when unset.
    pub topic: String,
    pub judge_id: Option<PlayerId>,
    pub accuser_ids: Vec<PlayerId>,
    pub defender_ids: Vec<PlayerId>,
    pub criterion: Option<Criterion>,
    pub round_winner: Option<Team>,
    pub target_score: u32,
    pub time_left: u32,
    pub timer_running: bool,
    pub game_winner_id: Option<PlayerId>,
    pub topic_mode: TopicMode,
    pub custom_topics: Vec<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: Phase::Lobby,
            players: Vec::new(),
            current_round: 0,
            topic: String::new(),
            judge_id: None,
            accuser_ids: Vec::new(),
            defender_ids: Vec::new(),
            criterion: None,
            round_winner: None,
            target_score: DEFAULT_TARGET_SCORE,
            time_left: DEBATE_SECONDS,
            timer_running: false,
            game_winner_id: None,
            topic_mode: TopicMode::Standard,
            custom_topics: Vec::new(),
        }
    }
}

impl GameState {
    /// Empty lobby with the given topic configuration.
    pub fn new(topic_mode: TopicMode, custom_topics: Vec<String>) -> Self {
        Self {
            topic_mode,
            custom_topics,
            ..Self::default()
        }
    }

    /// Look up a player by id.
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Whether a player with this id is in the roster.
    pub fn has_player(&self, id: &str) -> bool {
        self.player(id).is_some()
    }

    /// The player currently flagged as host.
    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    /// The current round's judge, if roles are assigned and they are still present.
    pub fn judge(&self) -> Option<&Player> {
        self.judge_id.as_deref().and_then(|id| self.player(id))
    }

    /// Whether `id` is the current judge.
    pub fn is_judge(&self, id: &str) -> bool {
        self.judge_id.as_deref() == Some(id)
    }

    /// Role of a player in the current round, if any.
    pub fn role_of(&self, id: &str) -> Option<Role> {
        if self.is_judge(id) {
            Some(Role::Judge)
        } else if self.accuser_ids.iter().any(|a| a == id) {
            Some(Role::Accuser)
        } else if self.defender_ids.iter().any(|d| d == id) {
            Some(Role::Defender)
        } else {
            None
        }
    }

    /// Ids assigned to a team this round.
    pub fn team_ids(&self, team: Team) -> &[PlayerId] {
        match team {
            Team::Accusers => &self.accuser_ids,
            Team::Defenders => &self.defender_ids,
        }
    }

    /// Players on a team, in roster order.
    pub fn team_members(&self, team: Team) -> Vec<&Player> {
        let ids = self.team_ids(team);
        self.players
            .iter()
            .filter(|p| ids.iter().any(|id| *id == p.id))
            .collect()
    }

    /// Players sorted by score, highest first. Equal scores keep roster order.
    pub fn leaderboard(&self) -> Vec<&Player> {
        let mut board: Vec<&Player> = self.players.iter().collect();
        board.sort_by(|a, b| b.score.cmp(&a.score));
        board
    }

    /// The game winner, once one is declared.
    pub fn game_winner(&self) -> Option<&Player> {
        self.game_winner_id.as_deref().and_then(|id| self.player(id))
    }
}
