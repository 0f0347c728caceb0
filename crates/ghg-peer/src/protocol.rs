//! Wire messages exchanged between host and clients.
//!
//! Every message is a JSON object `{"type": ..., "payload": ...}`. State
//! payloads are full snapshots, never diffs.

use ghg_game::{Action, GameState, PlayerId};
use serde::{Deserialize, Serialize};

/// Client asks the host for a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub player_id: PlayerId,
    pub player_name: String,
}

/// Host refuses a join request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRejection {
    pub reason: String,
}

/// An intent forwarded from a client to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAction {
    #[serde(flatten)]
    pub action: Action,
    pub sender_id: PlayerId,
}

/// All messages on a host/client channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WireMessage {
    /// client → host
    JoinRequest(JoinRequest),
    /// host → joining client, full snapshot
    JoinAccepted(GameState),
    /// host → joining client
    JoinRejected(JoinRejection),
    /// host → every client, unconditional replace
    SyncState(GameState),
    /// client → host
    ClientAction(ClientAction),
}

impl WireMessage {
    /// Message type name as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JoinRequest(_) => "JoinRequest",
            Self::JoinAccepted(_) => "JoinAccepted",
            Self::JoinRejected(_) => "JoinRejected",
            Self::SyncState(_) => "SyncState",
            Self::ClientAction(_) => "ClientAction",
        }
    }

    /// Serialize to a JSON text frame.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a JSON text frame.
    pub fn decode(frame: &str) -> serde_json::Result<Self> {
        serde_json::from_str(frame)
    }
}
