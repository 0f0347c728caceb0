//! Replication Layer: host-authoritative state with full-snapshot sync.
//!
//! ```text
//!   client UI ──Action──▶ ClientReplica ──ClientAction──▶ HostReplica
//!                              ▲                              │
//!                              └────────── SyncState ─────────┘
//! ```
//!
//! The host applies every intent through the game's `transition` and
//! broadcasts the resulting snapshot when it changed. Clients overwrite
//! their replica with whatever the host sends.

pub mod client;
pub mod history;
pub mod host;

pub use client::{ClientReplica, ClientStatus, DispatchOutcome};
pub use history::{TransitionLog, TransitionRecord};
pub use host::HostReplica;
