//! Rules engine for God, Hitler & Gandhi.
//!
//! A party debate game for 3 to 8 players. Each round one player is the
//! judge (God) and everyone else is split into accusers (Hitler) and
//! defenders (Gandhi). The judge rolls a criterion, the teams debate a
//! prompt against the clock, and the judge awards the round.
//!
//! This crate holds the pure, synchronous part of the game:
//!
//! - [`state`]: the replicated `GameState` snapshot and its value types
//! - [`action`]: the intents that drive it
//! - [`machine`]: guards and the `transition` function
//! - [`roles`]: the Role Assignor
//! - [`topics`]: the Topic Provider
//! - [`settings`]: host-chosen room settings
//!
//! Networking and replication live in the `ghg-peer` crate.

pub mod action;
pub mod error;
pub mod machine;
pub mod roles;
pub mod settings;
pub mod state;
pub mod topics;

pub use action::Action;
pub use error::{GameError, GameResult};
pub use machine::{check, transition, try_transition, validate_name};
pub use roles::{assign_roles, RoleAssignment};
pub use settings::{parse_custom_topics, validate_target_score, RoomSettings};
pub use state::{
    Criterion, GameState, Phase, Player, PlayerId, Role, Team, TopicMode, DEBATE_SECONDS,
    DEFAULT_TARGET_SCORE, MAX_NAME_LEN, MAX_PLAYERS, MIN_PLAYERS, TARGET_SCORE_OPTIONS,
};
pub use topics::{draw_topic, topic_for_state};
