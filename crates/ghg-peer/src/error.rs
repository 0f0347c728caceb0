//! Peer-level error types.

use ghg_game::{GameError, Phase};
use thiserror::Error;

use crate::config::ConfigError;
use crate::room_code::RoomCodeError;
use crate::transport::TransportError;

/// Result type alias for replication and runtime operations.
pub type PeerResult<T> = Result<T, PeerError>;

/// Errors surfaced to the participant's UI. None of them are fatal: the
/// participant stays on its current screen and may retry.
#[derive(Error, Debug)]
pub enum PeerError {
    /// A rule check refused the action.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Channel or peer failure.
    #[error("connection error: {0}")]
    Transport(#[from] TransportError),

    /// The room code typed by the user is unusable.
    #[error(transparent)]
    RoomCode(#[from] RoomCodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The host refused the join request.
    #[error("join rejected: {reason}")]
    JoinRejected { reason: String },

    /// Action attempted before the host accepted us.
    #[error("not connected to a room")]
    NotConnected,

    /// The channel to the host closed.
    #[error("disconnected from host")]
    DisconnectedFromHost,

    /// A participant task panicked or was cancelled.
    #[error("participant task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A simulated game stopped making progress.
    #[error("game stalled in round {round} during the {phase} phase")]
    Stalled { round: u32, phase: Phase },
}
