//! Connection Registry: host-side map from player id to transport channel.
//!
//! Owned by the host replica for the lifetime of the room and cleared on
//! teardown. Used for targeted sends, broadcasts and for resolving which
//! player a closed channel belonged to.

use std::collections::HashMap;

use ghg_game::PlayerId;
use tracing::{debug, warn};

use crate::protocol::WireMessage;
use crate::transport::{Channel, TransportError, TransportResult};

/// Delivery summary for one broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Channels the message was queued on.
    pub delivered: usize,
    /// Players whose channel was closed or rejected the send.
    pub failed: Vec<PlayerId>,
}

/// Player id → channel.
pub struct ConnectionRegistry<C> {
    channels: HashMap<PlayerId, C>,
}

impl<C: Channel> ConnectionRegistry<C> {
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
        }
    }

    /// Register a player's channel, returning any channel it replaces.
    pub fn register(&mut self, player_id: impl Into<PlayerId>, channel: C) -> Option<C> {
        let player_id = player_id.into();
        debug!(player = %player_id, peer = channel.peer_id(), "Channel registered");
        self.channels.insert(player_id, channel)
    }

    /// Forget a player's channel without closing it.
    pub fn remove(&mut self, player_id: &str) -> Option<C> {
        self.channels.remove(player_id)
    }

    /// Which player owns the channel to `peer_id`.
    pub fn player_for_peer(&self, peer_id: &str) -> Option<PlayerId> {
        self.channels
            .iter()
            .find(|(_, channel)| channel.peer_id() == peer_id)
            .map(|(player_id, _)| player_id.clone())
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.channels.contains_key(player_id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Send to a single player.
    pub fn send_to(&self, player_id: &str, message: &WireMessage) -> TransportResult<()> {
        match self.channels.get(player_id) {
            Some(channel) => channel.send(message),
            None => Err(TransportError::ChannelClosed {
                peer_id: player_id.to_string(),
            }),
        }
    }

    /// Send to every open channel, optionally skipping one player.
    pub fn broadcast(&self, message: &WireMessage, except: Option<&str>) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for (player_id, channel) in &self.channels {
            if Some(player_id.as_str()) == except {
                continue;
            }
            if !channel.is_open() {
                report.failed.push(player_id.clone());
                continue;
            }
            match channel.send(message) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(player = %player_id, kind = message.kind(), "Send failed: {e}");
                    report.failed.push(player_id.clone());
                }
            }
        }
        debug!(
            kind = message.kind(),
            delivered = report.delivered,
            failed = report.failed.len(),
            "Broadcast"
        );
        report
    }

    /// Close and forget every channel.
    pub fn clear(&mut self) {
        for (_, channel) in self.channels.drain() {
            channel.close();
        }
    }
}

impl<C: Channel> Default for ConnectionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
