//! Participant event loops.
//!
//! Each participant is one task on a single-threaded runtime. The loop
//! multiplexes transport events, UI intents, the debate timer (host only)
//! and room teardown. Every state change is published on a `watch`
//! channel for whatever renders it.

use std::sync::Arc;

use ghg_game::{Action, GameState};
use rand::rngs::StdRng;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{PeerError, PeerResult};
use crate::replication::{ClientReplica, ClientStatus, HostReplica};
use crate::room_code::RoomCode;
use crate::timer::DebateTimer;
use crate::transport::{Channel, Transport, TransportEvent};

/// Run the host until `shutdown` fires or the transport ends.
///
/// `transport` must already be listening at the room code. Returns the
/// host replica after teardown so callers can inspect the final state.
pub async fn run_host<T: Transport>(
    mut transport: T,
    mut host: HostReplica<T::Channel>,
    mut actions: mpsc::Receiver<Action>,
    updates: watch::Sender<Arc<GameState>>,
    shutdown: CancellationToken,
) -> HostReplica<T::Channel> {
    let mut timer = DebateTimer::new();
    let mut published = Arc::clone(host.state());
    updates.send_replace(Arc::clone(&published));

    loop {
        // Shutdown wins over queued events so a closing room never
        // processes departures after teardown was requested.
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!("Host shutdown requested");
                break;
            }
            event = transport.next_event() => match event {
                Some(TransportEvent::Incoming(channel)) => {
                    host.on_incoming(channel);
                }
                Some(TransportEvent::Message { peer_id, message }) => {
                    host.on_message(&peer_id, message);
                }
                Some(TransportEvent::Closed { peer_id }) => {
                    host.on_channel_closed(&peer_id);
                }
                None => {
                    warn!("Host transport closed");
                    break;
                }
            },
            Some(action) = actions.recv() => {
                if let Err(e) = host.dispatch(action) {
                    if e.is_user_facing() {
                        warn!("Host action refused: {e}");
                    } else {
                        debug!("Host action refused: {e}");
                    }
                }
            }
            _ = timer.tick() => {
                host.tick();
            }
        }

        timer.sync(host.timer_active());
        if !Arc::ptr_eq(&published, host.state()) {
            published = Arc::clone(host.state());
            updates.send_replace(Arc::clone(&published));
        }
    }

    host.teardown();
    host
}

/// Join the room at `room_code` and run the client until it leaves.
///
/// The local player id is the transport's own address. Fails when the
/// host cannot be reached or refuses the join; losing the host later is
/// reported through the returned replica's status.
pub async fn run_client<T: Transport>(
    mut transport: T,
    room_code: RoomCode,
    player_name: String,
    rng: StdRng,
    mut actions: mpsc::Receiver<Action>,
    updates: watch::Sender<Arc<GameState>>,
    shutdown: CancellationToken,
) -> PeerResult<ClientReplica<T::Channel>> {
    let channel = transport.connect(room_code.as_str()).await?;
    let player_id = transport.local_id().to_string();
    let mut client = ClientReplica::join(channel, player_id, &player_name, rng)?;
    info!(room = %room_code, player = %player_name, "Joining room");

    let mut published = Arc::clone(client.state());

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                client.leave();
                break;
            }
            event = transport.next_event() => match event {
                Some(TransportEvent::Message { message, .. }) => {
                    client.on_message(message);
                    if let ClientStatus::Rejected(reason) = client.status() {
                        return Err(PeerError::JoinRejected { reason: reason.clone() });
                    }
                }
                Some(TransportEvent::Closed { .. }) | None => {
                    client.on_host_closed();
                    break;
                }
                Some(TransportEvent::Incoming(channel)) => {
                    warn!(peer = channel.peer_id(), "Clients do not accept connections");
                    channel.close();
                }
            },
            Some(action) = actions.recv() => {
                if let Err(e) = client.dispatch(action) {
                    warn!("Action not sent: {e}");
                }
            }
        }

        if !Arc::ptr_eq(&published, client.state()) {
            published = Arc::clone(client.state());
            updates.send_replace(Arc::clone(&published));
        }
    }

    Ok(client)
}
