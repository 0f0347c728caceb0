//! In-process room with scripted participants.
//!
//! One host and `players - 1` clients run over a [`LocalNetwork`]. Every
//! participant is driven by a [`Bot`] that reacts to its own replica the
//! way a person at the table would: the host starts once everyone is in,
//! and the judge rolls, advances and picks winners.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ghg_game::{
    Action, GameState, Phase, Player, PlayerId, RoomSettings, Team, MAX_PLAYERS, MIN_PLAYERS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{PeerError, PeerResult};
use crate::replication::{HostReplica, TransitionLog};
use crate::room_code::RoomCode;
use crate::runtime::{run_client, run_host};
use crate::transport::{LocalNetwork, Transport};

const BOT_NAMES: [&str; MAX_PLAYERS] = [
    "Ada", "Boris", "Chidi", "Dolores", "Eamon", "Farah", "Gus", "Hiroko",
];

/// Pause before a bot reacts to a new state. Lets in-flight syncs land so
/// bots act on the host's view rather than a stale optimistic one.
const THINK_TIME: Duration = Duration::from_millis(250);

/// Give up if a game has not ended after this much game time.
const GAME_TIME_LIMIT: Duration = Duration::from_secs(6 * 60 * 60);

/// Parameters for one simulated room.
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub players: usize,
    pub settings: RoomSettings,
    pub seed: Option<u64>,
    pub host_name: String,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            players: 4,
            settings: RoomSettings::default(),
            seed: None,
            host_name: BOT_NAMES[0].to_string(),
        }
    }
}

/// Outcome of a finished simulation.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub room_code: RoomCode,
    pub final_state: GameState,
    pub history: TransitionLog,
}

impl SimulationReport {
    pub fn winner(&self) -> Option<&Player> {
        self.final_state.game_winner()
    }

    pub fn rounds(&self) -> u32 {
        self.final_state.current_round
    }

    pub fn transitions(&self) -> usize {
        self.history.len()
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Room {}: {} rounds", self.room_code, self.rounds())?;
        if let Some(winner) = self.winner() {
            writeln!(f, "Winner: {} ({} points)", winner.name, winner.score)?;
        }
        writeln!(f, "Leaderboard:")?;
        for (rank, player) in self.final_state.leaderboard().iter().enumerate() {
            let host = if player.is_host { " (host)" } else { "" };
            writeln!(f, "  {}. {:<10} {}{host}", rank + 1, player.name, player.score)?;
        }
        write!(f, "Phase transitions: {}", self.transitions())
    }
}

/// Scripted decision-making for one participant.
pub struct Bot {
    me: PlayerId,
    starts_game_at: Option<usize>,
    rng: StdRng,
    acted: HashSet<(u32, Phase, bool, bool)>,
}

impl Bot {
    /// A bot for a plain participant.
    pub fn new(me: impl Into<PlayerId>, rng: StdRng) -> Self {
        Self {
            me: me.into(),
            starts_game_at: None,
            rng,
            acted: HashSet::new(),
        }
    }

    /// A bot that starts the game once `players` have joined.
    pub fn host(me: impl Into<PlayerId>, players: usize, rng: StdRng) -> Self {
        Self {
            starts_game_at: Some(players),
            ..Self::new(me, rng)
        }
    }

    /// What to do in `state`, at most once per distinct situation.
    pub fn decide(&mut self, state: &GameState) -> Vec<Action> {
        let key = (
            state.current_round,
            state.phase,
            state.criterion.is_some(),
            state.timer_running,
        );
        if self.acted.contains(&key) {
            return Vec::new();
        }

        let actions = if state.phase == Phase::Lobby {
            match self.starts_game_at {
                Some(wanted) if state.players.len() >= wanted => vec![Action::StartGame],
                _ => Vec::new(),
            }
        } else if state.is_judge(&self.me) {
            self.judge(state)
        } else {
            Vec::new()
        };

        if !actions.is_empty() {
            self.acted.insert(key);
        }
        actions
    }

    fn judge(&mut self, state: &GameState) -> Vec<Action> {
        match state.phase {
            // Every other round the judge vetoes the first prompt.
            Phase::Topic if state.current_round % 2 == 0 => {
                vec![Action::ChangeTopic, Action::AdvancePhase]
            }
            Phase::Dice if state.criterion.is_none() => vec![Action::RollDice],
            Phase::Debate if state.timer_running => Vec::new(),
            Phase::Sentence => {
                let team = if self.rng.random_bool(0.5) {
                    Team::Accusers
                } else {
                    Team::Defenders
                };
                vec![Action::SelectWinner { team }]
            }
            Phase::Roles | Phase::Topic | Phase::Dice | Phase::Debate | Phase::Results => {
                vec![Action::AdvancePhase]
            }
            Phase::Lobby | Phase::Gameover => Vec::new(),
        }
    }
}

async fn drive(
    mut bot: Bot,
    mut states: watch::Receiver<Arc<GameState>>,
    actions: mpsc::Sender<Action>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            changed = states.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
        time::sleep(THINK_TIME).await;

        let state = states.borrow_and_update().clone();
        for action in bot.decide(&state) {
            debug!(bot = %bot.me, action = %action, "Bot acts");
            if actions.send(action).await.is_err() {
                return;
            }
        }
    }
}

/// Play one full game in-process and report the result.
pub async fn run(options: SimulationOptions) -> PeerResult<SimulationReport> {
    let SimulationOptions {
        players,
        settings,
        seed,
        host_name,
    } = options;
    let players = players.clamp(MIN_PLAYERS, MAX_PLAYERS);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let network = LocalNetwork::new();
    let room_code = RoomCode::generate(&mut rng);
    // The host stops before anyone else so departures never reach the
    // final roster.
    let host_shutdown = CancellationToken::new();
    let peer_shutdown = CancellationToken::new();
    let mut bots: Vec<JoinHandle<()>> = Vec::new();

    let host_id = Player::generate_id();
    let mut host_transport = network.endpoint(host_id.clone());
    host_transport.listen(room_code.as_str()).await?;
    let host = HostReplica::new(
        host_id.clone(),
        &host_name,
        &settings,
        StdRng::seed_from_u64(rng.random()),
    )?;
    info!(room = %room_code, players, target = settings.target_score, "Simulation started");

    let (host_actions_tx, host_actions_rx) = mpsc::channel(32);
    let (host_updates_tx, mut host_updates) = watch::channel(Arc::clone(host.state()));
    bots.push(tokio::spawn(drive(
        Bot::host(host_id, players, StdRng::seed_from_u64(rng.random())),
        host_updates.clone(),
        host_actions_tx,
        peer_shutdown.child_token(),
    )));
    let host_task = tokio::spawn(run_host(
        host_transport,
        host,
        host_actions_rx,
        host_updates_tx,
        host_shutdown.clone(),
    ));

    let mut clients = Vec::new();
    for name in BOT_NAMES.iter().skip(1).take(players - 1) {
        let client_id = Player::generate_id();
        let transport = network.endpoint(client_id.clone());
        let (actions_tx, actions_rx) = mpsc::channel(32);
        let (updates_tx, updates_rx) = watch::channel(Arc::new(GameState::default()));

        bots.push(tokio::spawn(drive(
            Bot::new(client_id, StdRng::seed_from_u64(rng.random())),
            updates_rx,
            actions_tx,
            peer_shutdown.child_token(),
        )));
        clients.push(tokio::spawn(run_client(
            transport,
            room_code.clone(),
            name.to_string(),
            StdRng::seed_from_u64(rng.random()),
            actions_rx,
            updates_tx,
            peer_shutdown.child_token(),
        )));
    }

    // Cloned inside the match so the watch guard is released before
    // anything else awaits.
    let gameover = match time::timeout(
        GAME_TIME_LIMIT,
        host_updates.wait_for(|state| state.phase == Phase::Gameover),
    )
    .await
    {
        Ok(Ok(state)) => Some(Arc::clone(&*state)),
        _ => None,
    };

    host_shutdown.cancel();
    let host = host_task.await?;
    peer_shutdown.cancel();
    for client in clients {
        if let Ok(Err(e)) = client.await {
            debug!("Simulated client ended with error: {e}");
        }
    }
    for bot in bots {
        let _ = bot.await;
    }

    let Some(final_state) = gameover else {
        return Err(PeerError::Stalled {
            round: host.state().current_round,
            phase: host.state().phase,
        });
    };

    let report = SimulationReport {
        room_code,
        final_state: (*final_state).clone(),
        history: host.history().clone(),
    };
    info!(
        rounds = report.rounds(),
        transitions = report.transitions(),
        path = %report.history.summary(),
        "Simulation finished"
    );
    Ok(report)
}
