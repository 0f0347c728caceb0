//! Host replica: the single authoritative copy of the game state.
//!
//! Every mutation goes through [`HostReplica::apply`], which runs the state
//! machine and, when the resulting `Arc` differs from the previous one,
//! broadcasts the full snapshot to every open channel.

use std::collections::HashMap;
use std::sync::Arc;

use ghg_game::{try_transition, Action, GameError, GameState, PlayerId, RoomSettings};
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use super::history::TransitionLog;
use crate::error::PeerResult;
use crate::protocol::{ClientAction, JoinRejection, JoinRequest, WireMessage};
use crate::registry::ConnectionRegistry;
use crate::transport::Channel;

/// Authoritative state plus every client connection.
pub struct HostReplica<C> {
    local_id: PlayerId,
    state: Arc<GameState>,
    registry: ConnectionRegistry<C>,
    /// Channels that opened but have not asked for a seat yet.
    pending: HashMap<String, C>,
    rng: StdRng,
    history: TransitionLog,
}

impl<C: Channel> HostReplica<C> {
    /// Create the room, seat the host as its first player and apply
    /// `settings` through the lobby actions.
    pub fn new(
        host_id: impl Into<PlayerId>,
        host_name: &str,
        settings: &RoomSettings,
        rng: StdRng,
    ) -> PeerResult<Self> {
        let mut host = Self {
            local_id: host_id.into(),
            state: Arc::new(GameState::default()),
            registry: ConnectionRegistry::new(),
            pending: HashMap::new(),
            rng,
            history: TransitionLog::new(),
        };
        let seat = Action::AddPlayer {
            player_id: host.local_id.clone(),
            name: host_name.to_string(),
        };
        host.state = try_transition(&host.state, &seat, &mut host.rng)?;
        host.configure(settings)?;
        info!(host = %host.local_id, "Room created");
        Ok(host)
    }

    /// Current authoritative snapshot.
    pub fn state(&self) -> &Arc<GameState> {
        &self.state
    }

    /// The host's own player id.
    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn registry(&self) -> &ConnectionRegistry<C> {
        &self.registry
    }

    pub fn history(&self) -> &TransitionLog {
        &self.history
    }

    /// Whether the debate clock should be ticking.
    pub fn timer_active(&self) -> bool {
        self.state.timer_running && self.state.time_left > 0
    }

    /// Run `action` against the authoritative state; broadcast on change.
    ///
    /// Returns whether the state changed.
    pub fn apply(&mut self, action: &Action) -> Result<bool, GameError> {
        let next = try_transition(&self.state, action, &mut self.rng)?;
        if Arc::ptr_eq(&next, &self.state) {
            return Ok(false);
        }
        self.history.observe(&self.state, &next, action.name());
        self.state = next;
        self.registry
            .broadcast(&WireMessage::SyncState((*self.state).clone()), None);
        Ok(true)
    }

    /// Replace the room's topic source and target score. Lobby only.
    pub fn configure(&mut self, settings: &RoomSettings) -> Result<bool, GameError> {
        for action in settings.as_actions() {
            ghg_game::check(&self.state, &action)?;
        }
        let mut changed = false;
        for action in settings.as_actions() {
            changed |= self.apply(&action)?;
        }
        Ok(changed)
    }

    /// An intent from the host's own UI.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, GameError> {
        debug!(action = %action, "Host action");
        self.apply(&action)
    }

    /// Seat a joining client, or tell it why not.
    pub fn on_join_request(&mut self, channel: C, request: JoinRequest) -> PeerResult<()> {
        let JoinRequest {
            player_id,
            player_name,
        } = request;
        let seat = Action::AddPlayer {
            player_id: player_id.clone(),
            name: player_name,
        };

        let next = match try_transition(&self.state, &seat, &mut self.rng) {
            Ok(next) => next,
            Err(e) => {
                info!(player = %player_id, peer = channel.peer_id(), "Join rejected: {e}");
                let reply = channel.send(&WireMessage::JoinRejected(JoinRejection {
                    reason: e.to_string(),
                }));
                channel.close();
                reply?;
                return Err(e.into());
            }
        };

        self.history.observe(&self.state, &next, seat.name());
        self.state = next;
        self.registry.register(player_id.clone(), channel);
        info!(
            player = %player_id,
            players = self.state.players.len(),
            "Player joined"
        );

        let snapshot = (*self.state).clone();
        self.registry
            .send_to(&player_id, &WireMessage::JoinAccepted(snapshot.clone()))?;
        self.registry
            .broadcast(&WireMessage::SyncState(snapshot), Some(&player_id));
        Ok(())
    }

    /// An intent forwarded by a client.
    pub fn on_client_action(&mut self, peer_id: &str, message: ClientAction) -> bool {
        let ClientAction { action, sender_id } = message;

        let Some(owner) = self.registry.player_for_peer(peer_id) else {
            warn!(sender = %sender_id, peer = peer_id, action = action.name(), "Ignoring action from unseated peer");
            return false;
        };
        if action.is_host_internal() {
            warn!(sender = %sender_id, action = action.name(), "Ignoring host-only action from client");
            return false;
        }
        if owner != sender_id {
            debug!(sender = %sender_id, peer = peer_id, "Sender id does not match channel owner");
        }

        match self.apply(&action) {
            Ok(changed) => changed,
            Err(e) => {
                debug!(sender = %sender_id, action = action.name(), "Client action refused: {e}");
                false
            }
        }
    }

    /// A remote peer opened a channel. It stays pending until it asks for a
    /// seat.
    pub fn on_incoming(&mut self, channel: C) {
        debug!(peer = channel.peer_id(), "Incoming connection");
        self.pending.insert(channel.peer_id().to_string(), channel);
    }

    /// Number of channels still waiting to join.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Route one inbound message from a channel.
    pub fn on_message(&mut self, peer_id: &str, message: WireMessage) {
        match message {
            WireMessage::JoinRequest(request) => {
                let Some(channel) = self.pending.remove(peer_id) else {
                    warn!(peer = peer_id, "Join request on an unknown or seated channel");
                    return;
                };
                if let Err(e) = self.on_join_request(channel, request) {
                    debug!(peer = peer_id, "Join not completed: {e}");
                }
            }
            WireMessage::ClientAction(action) => {
                self.on_client_action(peer_id, action);
            }
            other => {
                warn!(peer = peer_id, kind = other.kind(), "Unexpected message at host");
            }
        }
    }

    /// A channel closed: drop its player and tell everyone else.
    pub fn on_channel_closed(&mut self, peer_id: &str) -> bool {
        if self.pending.remove(peer_id).is_some() {
            debug!(peer = peer_id, "Pending channel closed before joining");
            return false;
        }
        let Some(player_id) = self.registry.player_for_peer(peer_id) else {
            debug!(peer = peer_id, "Closed channel had no seated player");
            return false;
        };
        self.registry.remove(&player_id);
        info!(player = %player_id, "Player left");

        let leave = Action::RemovePlayer { player_id };
        match self.apply(&leave) {
            Ok(changed) => changed,
            Err(e) => {
                warn!("Failed to remove departed player: {e}");
                false
            }
        }
    }

    /// One second of debate time elapsed.
    pub fn tick(&mut self) -> bool {
        self.apply(&Action::Tick).unwrap_or(false)
    }

    /// End of room lifetime: close every channel.
    pub fn teardown(&mut self) {
        info!(connections = self.registry.len(), "Room closed");
        for (_, channel) in self.pending.drain() {
            channel.close();
        }
        self.registry.clear();
    }
}
