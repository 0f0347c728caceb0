//! Role Assignor: picks the round's judge and splits everyone else into teams.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::state::{Player, PlayerId};

/// Outcome of a role draw for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub judge_id: PlayerId,
    pub accuser_ids: Vec<PlayerId>,
    pub defender_ids: Vec<PlayerId>,
}

/// Draw roles for a round.
///
/// The judge is chosen uniformly, skipping `previous_judge` whenever someone
/// else is available. The remaining players are shuffled and the first half
/// (rounded up) accuses, the rest defend, so an odd remainder puts the extra
/// player on the accuser side. Returns `None` for an empty roster.
pub fn assign_roles(
    players: &[Player],
    previous_judge: Option<&str>,
    rng: &mut impl Rng,
) -> Option<RoleAssignment> {
    if players.is_empty() {
        return None;
    }

    let mut candidates: Vec<&Player> = players
        .iter()
        .filter(|p| Some(p.id.as_str()) != previous_judge)
        .collect();
    if candidates.is_empty() {
        candidates = players.iter().collect();
    }

    let judge = candidates[rng.random_range(0..candidates.len())];

    let mut others: Vec<PlayerId> = players
        .iter()
        .filter(|p| p.id != judge.id)
        .map(|p| p.id.clone())
        .collect();
    others.shuffle(rng);

    let half = others.len().div_ceil(2);
    let defender_ids = others.split_off(half);

    Some(RoleAssignment {
        judge_id: judge.id.clone(),
        accuser_ids: others,
        defender_ids,
    })
}
