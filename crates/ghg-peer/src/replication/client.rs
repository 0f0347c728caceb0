//! Client replica: a read-mostly copy of the host's state.
//!
//! The host's snapshot always wins. The only local mutation is the judge's
//! optimistic application of judge-gated actions, which makes the judge's
//! own screen react before the host's echo arrives.

use std::fmt;
use std::sync::Arc;

use ghg_game::{transition, Action, GameState, PlayerId};
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::error::{PeerError, PeerResult};
use crate::protocol::{ClientAction, JoinRequest, WireMessage};
use crate::transport::Channel;

/// Where the client is in its connection lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientStatus {
    /// Join request sent, waiting for the host.
    Joining,
    Joined,
    /// The host refused us.
    Rejected(String),
    Disconnected,
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Joining => write!(f, "joining"),
            Self::Joined => write!(f, "joined"),
            Self::Rejected(reason) => write!(f, "rejected: {reason}"),
            Self::Disconnected => write!(f, "disconnected from host"),
        }
    }
}

/// What `ClientReplica::dispatch` did with an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Applied to the local replica and sent to the host.
    AppliedAndForwarded,
    /// Sent to the host only.
    Forwarded,
}

pub struct ClientReplica<C> {
    local_id: PlayerId,
    host: C,
    state: Arc<GameState>,
    status: ClientStatus,
    rng: StdRng,
}

impl<C: Channel> ClientReplica<C> {
    /// Ask the host behind `host` for a seat.
    pub fn join(
        host: C,
        player_id: impl Into<PlayerId>,
        player_name: &str,
        rng: StdRng,
    ) -> PeerResult<Self> {
        let local_id = player_id.into();
        host.send(&WireMessage::JoinRequest(JoinRequest {
            player_id: local_id.clone(),
            player_name: player_name.to_string(),
        }))?;
        debug!(player = %local_id, host = host.peer_id(), "Join requested");
        Ok(Self {
            local_id,
            host,
            state: Arc::new(GameState::default()),
            status: ClientStatus::Joining,
            rng,
        })
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn state(&self) -> &Arc<GameState> {
        &self.state
    }

    pub fn status(&self) -> &ClientStatus {
        &self.status
    }

    /// Whether the local player may apply `action` optimistically.
    pub fn is_entitled(&self, action: &Action) -> bool {
        action.is_judge_gated() && self.state.is_judge(&self.local_id)
    }

    /// Send a UI intent to the host, applying it locally first when the
    /// local player is the judge.
    pub fn dispatch(&mut self, action: Action) -> PeerResult<DispatchOutcome> {
        match &self.status {
            ClientStatus::Joined => {}
            ClientStatus::Disconnected => return Err(PeerError::DisconnectedFromHost),
            _ => return Err(PeerError::NotConnected),
        }

        let outcome = if self.is_entitled(&action) {
            self.state = transition(&self.state, &action, &mut self.rng);
            DispatchOutcome::AppliedAndForwarded
        } else {
            DispatchOutcome::Forwarded
        };

        self.host.send(&WireMessage::ClientAction(ClientAction {
            action,
            sender_id: self.local_id.clone(),
        }))?;
        Ok(outcome)
    }

    /// Handle a message from the host. Returns whether the replica changed.
    pub fn on_message(&mut self, message: WireMessage) -> bool {
        match message {
            WireMessage::JoinAccepted(state) => {
                info!(player = %self.local_id, players = state.players.len(), "Joined room");
                self.status = ClientStatus::Joined;
                self.replace(state)
            }
            WireMessage::SyncState(state) => self.replace(state),
            WireMessage::JoinRejected(rejection) => {
                warn!(player = %self.local_id, reason = %rejection.reason, "Join rejected");
                self.status = ClientStatus::Rejected(rejection.reason);
                self.host.close();
                false
            }
            other => {
                warn!(kind = other.kind(), "Unexpected message at client");
                false
            }
        }
    }

    /// The channel to the host closed.
    pub fn on_host_closed(&mut self) {
        if matches!(self.status, ClientStatus::Rejected(_)) {
            return;
        }
        info!(player = %self.local_id, "Disconnected from host");
        self.status = ClientStatus::Disconnected;
    }

    /// Leave the room.
    pub fn leave(&mut self) {
        self.host.close();
        self.status = ClientStatus::Disconnected;
    }

    fn replace(&mut self, state: GameState) -> bool {
        if *self.state == state {
            return false;
        }
        self.state = Arc::new(state);
        true
    }
}
