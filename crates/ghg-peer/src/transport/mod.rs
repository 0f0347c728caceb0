//! Transport abstraction for peer-to-peer data channels.
//!
//! The replication layer depends only on these traits. How channels are
//! established (signalling, NAT traversal, WebRTC) is the implementation's
//! concern.
//!
//! ```text
//! ┌──────────────┐  connect(room code)   ┌──────────────┐
//! │    Client    │──────────────────────▶│     Host     │
//! │  Transport   │                       │  Transport   │
//! │              │◀──── Channel ────────▶│  (listen)    │
//! └──────────────┘                       └──────────────┘
//! ```
//!
//! Callbacks (`onIncomingConnection`, `onMessage`, `onClose`) are surfaced as
//! a single ordered stream of [`TransportEvent`]s pulled with
//! [`Transport::next_event`].

pub mod local;

pub use local::{LocalChannel, LocalNetwork, LocalTransport};

use async_trait::async_trait;

use crate::protocol::WireMessage;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("no peer is listening at {address}")]
    Unreachable { address: String },

    #[error("address {address} is already taken")]
    AddressInUse { address: String },

    #[error("channel to {peer_id} is closed")]
    ChannelClosed { peer_id: String },

    #[error("failed to encode message: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// One open data channel to a remote peer.
pub trait Channel: Send + Sync {
    /// Address of the remote end.
    fn peer_id(&self) -> &str;

    /// Whether messages can still be sent.
    fn is_open(&self) -> bool;

    /// Queue a message for delivery. Never blocks.
    fn send(&self, message: &WireMessage) -> TransportResult<()>;

    /// Close the channel. The remote end observes a `Closed` event.
    fn close(&self);
}

/// Something that happened on the transport.
#[derive(Debug)]
pub enum TransportEvent<C> {
    /// A remote peer opened a channel to us.
    Incoming(C),
    /// A message arrived on the channel to `peer_id`.
    Message { peer_id: String, message: WireMessage },
    /// The channel to `peer_id` closed.
    Closed { peer_id: String },
}

/// A participant's endpoint on the peer network.
#[async_trait]
pub trait Transport: Send {
    type Channel: Channel + Clone + 'static;

    /// This endpoint's own address.
    fn local_id(&self) -> &str;

    /// Accept incoming channels at `address` (the room code, for hosts).
    async fn listen(&mut self, address: &str) -> TransportResult<()>;

    /// Open a channel to a listening peer.
    async fn connect(&mut self, remote: &str) -> TransportResult<Self::Channel>;

    /// Next event, or `None` once the endpoint is shut down.
    async fn next_event(&mut self) -> Option<TransportEvent<Self::Channel>>;
}
