use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ghg_peer::config::PeerConfig;
use ghg_peer::room_code::RoomCode;
use ghg_peer::simulation::{self, SimulationOptions};
use ghg_peer::telemetry::init_tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "God, Hitler & Gandhi peer tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a fresh room code.
    RoomCode {
        /// Seed for a repeatable code.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play a whole game in-process with scripted players.
    Simulate {
        /// Number of players including the host (3-8).
        #[arg(long, default_value_t = 4)]
        players: usize,

        /// Points needed to win (3, 5, 7 or 10).
        #[arg(long)]
        target_score: Option<u32>,

        /// standard, custom or hybrid.
        #[arg(long)]
        topic_mode: Option<String>,

        /// Newline-separated custom prompts.
        #[arg(long)]
        custom_topics_file: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,

        /// TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Run debates on the wall clock instead of a paused one.
        #[arg(long, default_value_t = false)]
        realtime: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::RoomCode { seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            println!("{}", RoomCode::generate(&mut rng));
        }
        Command::Simulate {
            players,
            target_score,
            topic_mode,
            custom_topics_file,
            seed,
            config,
            realtime,
        } => {
            let mut peer = match &config {
                Some(path) => PeerConfig::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => PeerConfig::default(),
            };
            if let Some(score) = target_score {
                peer.target_score = score;
            }
            if let Some(mode) = topic_mode {
                peer.topic_mode = mode;
            }
            if custom_topics_file.is_some() {
                peer.custom_topics_file = custom_topics_file;
            }
            if seed.is_some() {
                peer.seed = seed;
            }
            let settings = peer.room_settings().context("Invalid room settings")?;

            if !realtime {
                tokio::time::pause();
            }
            info!(
                players,
                topic_mode = %settings.topic_mode,
                target = settings.target_score,
                realtime,
                "Simulating room"
            );

            let report = simulation::run(SimulationOptions {
                players,
                settings,
                seed: peer.seed,
                host_name: peer.player_name,
            })
            .await
            .context("Simulation failed")?;
            println!("{report}");
        }
    }

    Ok(())
}
