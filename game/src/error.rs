//! Rule violations reported by the state machine guards.

use thiserror::Error;

use crate::state::{Phase, PlayerId};

/// Result type alias for rule checks.
pub type GameResult<T> = Result<T, GameError>;

/// Why an action was refused. A refused action never changes the state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The action is not valid in the current phase.
    #[error("{action} is not allowed during the {phase} phase")]
    WrongPhase { action: &'static str, phase: Phase },

    /// The room already holds the maximum number of players.
    #[error("room is full ({max} players)")]
    RosterFull { max: usize },

    /// Not enough players to start a game.
    #[error("need at least {need} players to start, have {have}")]
    NotEnoughPlayers { have: usize, need: usize },

    /// Player name is blank after trimming.
    #[error("player name must not be empty")]
    EmptyName,

    /// Player name exceeds the length limit.
    #[error("player name is longer than {max} characters")]
    NameTooLong { max: usize },

    /// A player with this id already joined.
    #[error("player {0} is already in the room")]
    DuplicatePlayer(PlayerId),

    /// No player with this id is in the room.
    #[error("player {0} is not in the room")]
    UnknownPlayer(PlayerId),

    /// Target score outside the accepted range.
    #[error("invalid target score {0}")]
    InvalidTargetScore(u32),

    /// The dice were already rolled this round.
    #[error("criterion already rolled this round")]
    CriterionAlreadyRolled,

    /// The debate cannot start before the dice are rolled.
    #[error("roll the dice before starting the debate")]
    CriterionNotRolled,

    /// Timer tick while the debate clock is stopped or expired.
    #[error("debate timer is not running")]
    TimerIdle,
}

impl GameError {
    /// Whether this is a capacity/validation problem worth showing to the user.
    ///
    /// Phase and timer mismatches are routine during replication races and
    /// are usually only logged.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::WrongPhase { .. } | Self::TimerIdle)
    }
}
