//! Peer networking for God, Hitler & Gandhi.
//!
//! One participant hosts the room and owns the authoritative game state;
//! everyone else connects to the host by room code and mirrors that state.
//!
//! - [`protocol`]: JSON wire messages
//! - [`transport`]: channel abstraction and an in-process implementation
//! - [`registry`]: the host's player → channel map
//! - [`replication`]: host and client replicas
//! - [`timer`]: the host's debate clock
//! - [`runtime`]: async event loops for both roles
//! - [`simulation`]: a whole room of scripted players in one process

pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod replication;
pub mod room_code;
pub mod runtime;
pub mod simulation;
pub mod telemetry;
pub mod timer;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, PeerConfig};
pub use error::{PeerError, PeerResult};
pub use protocol::{ClientAction, JoinRejection, JoinRequest, WireMessage};
pub use registry::{BroadcastReport, ConnectionRegistry};
pub use replication::{ClientReplica, ClientStatus, DispatchOutcome, HostReplica, TransitionLog};
pub use room_code::{RoomCode, RoomCodeError};
pub use simulation::{SimulationOptions, SimulationReport};
pub use timer::DebateTimer;
pub use transport::{Channel, Transport, TransportError, TransportEvent};
