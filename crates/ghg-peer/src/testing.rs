//! Test doubles shared by unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::protocol::WireMessage;
use crate::transport::{Channel, TransportError, TransportResult};

/// Channel that records everything sent on it.
#[derive(Debug, Clone)]
pub struct RecordingChannel {
    peer_id: String,
    sent: Arc<Mutex<Vec<WireMessage>>>,
    open: Arc<AtomicBool>,
}

impl RecordingChannel {
    pub fn new(peer_id: &str) -> Self {
        Self {
            peer_id: peer_id.to_string(),
            sent: Arc::new(Mutex::new(Vec::new())),
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn sent(&self) -> Vec<WireMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<WireMessage> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl Channel for RecordingChannel {
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
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn close(&self) {
        self.open.store(false, Ordering::Release);
    }
}
