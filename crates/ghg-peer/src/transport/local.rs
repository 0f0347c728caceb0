//! In-process transport over tokio channels.
//!
//! `LocalNetwork` plays the role of the signalling server: it maps listening
//! addresses to endpoint inboxes. Channels carry JSON text frames, so the
//! wire codec is exercised exactly as it would be over a real data channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{Channel, Transport, TransportError, TransportEvent, TransportResult};
use crate::protocol::WireMessage;

/// What travels between endpoint inboxes.
#[derive(Debug)]
enum Frame {
    Incoming(LocalChannel),
    Text { from: String, text: String },
    Closed { from: String },
}

type Inbox = mpsc::UnboundedSender<Frame>;

/// Registry of listening endpoints, shared by every participant in a process.
#[derive(Debug, Default)]
pub struct LocalNetwork {
    listeners: Mutex<HashMap<String, Inbox>>,
}

impl LocalNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create an endpoint with the given local address.
    pub fn endpoint(self: &Arc<Self>, local_id: impl Into<String>) -> LocalTransport {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        LocalTransport {
            local_id: local_id.into(),
            network: Arc::clone(self),
            inbox_tx,
            inbox_rx,
            listening: None,
            links: Vec::new(),
        }
    }

    /// Whether anyone is listening at `address`.
    pub fn is_listening(&self, address: &str) -> bool {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(address)
    }

    fn register(&self, address: &str, inbox: Inbox) -> TransportResult<()> {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        if listeners.contains_key(address) {
            return Err(TransportError::AddressInUse {
                address: address.to_string(),
            });
        }
        listeners.insert(address.to_string(), inbox);
        Ok(())
    }

    fn unregister(&self, address: &str) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(address);
    }

    fn lookup(&self, address: &str) -> Option<Inbox> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .cloned()
    }
}

/// One end of an in-process channel. Both ends share the open flag.
#[derive(Debug, Clone)]
pub struct LocalChannel {
    peer_id: String,
    local_id: String,
    remote_inbox: Inbox,
    open: Arc<AtomicBool>,
}

impl Channel for LocalChannel {
    fn peer_id(&self) -> &str {
        &self.peer_id
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn send(&self, message: &WireMessage) -> TransportResult<()> {
        if !self.is_open() {
            return Err(TransportError::ChannelClosed {
                peer_id: self.peer_id.clone(),
            });
        }
        let text = message.encode()?;
        self.remote_inbox
            .send(Frame::Text {
                from: self.local_id.clone(),
                text,
            })
            .map_err(|_| {
                self.open.store(false, Ordering::Release);
                TransportError::ChannelClosed {
                    peer_id: self.peer_id.clone(),
                }
            })
    }

    fn close(&self) {
        if self.open.swap(false, Ordering::AcqRel) {
            // Remote endpoint may already be gone.
            let _ = self.remote_inbox.send(Frame::Closed {
                from: self.local_id.clone(),
            });
        }
    }
}

/// A participant's endpoint on a [`LocalNetwork`].
pub struct LocalTransport {
    local_id: String,
    network: Arc<LocalNetwork>,
    inbox_tx: Inbox,
    inbox_rx: mpsc::UnboundedReceiver<Frame>,
    listening: Option<String>,
    links: Vec<LocalChannel>,
}

impl LocalTransport {
    /// Close every channel, stop listening and end the event stream.
    pub fn shutdown(&mut self) {
        for link in self.links.drain(..) {
            link.close();
        }
        if let Some(address) = self.listening.take() {
            self.network.unregister(&address);
        }
        self.inbox_rx.close();
    }
}

impl Drop for LocalTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[async_trait]
impl Transport for LocalTransport {
    type Channel = LocalChannel;

    fn local_id(&self) -> &str {
        &self.local_id
    }

    async fn listen(&mut self, address: &str) -> TransportResult<()> {
        self.network.register(address, self.inbox_tx.clone())?;
        self.listening = Some(address.to_string());
        debug!(address, "Listening");
        Ok(())
    }

    async fn connect(&mut self, remote: &str) -> TransportResult<LocalChannel> {
        let unreachable = || TransportError::Unreachable {
            address: remote.to_string(),
        };
        let remote_inbox = self.network.lookup(remote).ok_or_else(unreachable)?;

        let open = Arc::new(AtomicBool::new(true));
        let ours = LocalChannel {
            peer_id: remote.to_string(),
            local_id: self.local_id.clone(),
            remote_inbox: remote_inbox.clone(),
            open: Arc::clone(&open),
        };
        let theirs = LocalChannel {
            peer_id: self.local_id.clone(),
            local_id: remote.to_string(),
            remote_inbox: self.inbox_tx.clone(),
            open,
        };

        remote_inbox
            .send(Frame::Incoming(theirs))
            .map_err(|_| unreachable())?;
        self.links.push(ours.clone());
        debug!(local = %self.local_id, remote, "Channel opened");
        Ok(ours)
    }

    async fn next_event(&mut self) -> Option<TransportEvent<LocalChannel>> {
        loop {
            match self.inbox_rx.recv().await? {
                Frame::Incoming(channel) => {
                    self.links.push(channel.clone());
                    return Some(TransportEvent::Incoming(channel));
                }
                Frame::Text { from, text } => match WireMessage::decode(&text) {
                    Ok(message) => {
                        return Some(TransportEvent::Message {
                            peer_id: from,
                            message,
                        })
                    }
                    Err(e) => warn!(peer = %from, "Dropping malformed frame: {e}"),
                },
                Frame::Closed { from } => {
                    self.links.retain(|link| link.peer_id != from);
                    return Some(TransportEvent::Closed { peer_id: from });
                }
            }
        }
    }
}
