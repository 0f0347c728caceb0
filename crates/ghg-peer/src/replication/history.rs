//! Phase transition log kept by the host for diagnostics and replay.

use chrono::{DateTime, Utc};
use ghg_game::{GameState, Phase};
use serde::{Deserialize, Serialize};

/// A single recorded phase change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: Phase,
    pub to: Phase,
    /// Round number after the transition.
    pub round: u32,
    /// Action that caused it.
    pub action: String,
    pub at: DateTime<Utc>,
}

/// Ordered phase history of the game currently being played in a room.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionLog {
    records: Vec<TransitionRecord>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the step from `before` to `after` if the phase changed.
    ///
    /// Returning to the lobby starts a new game and discards the old one's
    /// records.
    pub fn observe(&mut self, before: &GameState, after: &GameState, action: &str) {
        if before.phase == after.phase {
            return;
        }
        if after.phase == Phase::Lobby {
            self.records.clear();
            return;
        }
        self.records.push(TransitionRecord {
            from: before.phase,
            to: after.phase,
            round: after.current_round,
            action: action.to_string(),
            at: Utc::now(),
        });
    }

    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of completed rounds (entries into `results`).
    pub fn rounds_completed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.to == Phase::Results)
            .count()
    }

    /// Compact `lobby → roles → ...` rendering of the phase path.
    pub fn summary(&self) -> String {
        let Some(first) = self.records.first() else {
            return "no transitions".to_string();
        };
        let mut path = vec![first.from.to_string()];
        path.extend(self.records.iter().map(|r| r.to.to_string()));
        format!("{} ({} transitions)", path.join(" → "), self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(phase: Phase, round: u32) -> GameState {
        GameState {
            phase,
            current_round: round,
            ..GameState::default()
        }
    }

    #[test]
    fn test_only_phase_changes_are_recorded() {
        let mut log = TransitionLog::new();
        log.observe(&at(Phase::Debate, 1), &at(Phase::Debate, 1), "Tick");
        assert!(log.is_empty());

        log.observe(&at(Phase::Lobby, 0), &at(Phase::Roles, 1), "StartGame");
        log.observe(&at(Phase::Sentence, 1), &at(Phase::Results, 1), "SelectWinner");
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].round, 1);
        assert_eq!(log.rounds_completed(), 1);
    }

    #[test]
    fn test_summary() {
        let mut log = TransitionLog::new();
        assert_eq!(log.summary(), "no transitions");
        log.observe(&at(Phase::Lobby, 0), &at(Phase::Roles, 1), "StartGame");
        log.observe(&at(Phase::Roles, 1), &at(Phase::Topic, 1), "AdvancePhase");
        assert_eq!(log.summary(), "lobby → roles → topic (2 transitions)");
    }

    #[test]
    fn test_restart_starts_a_fresh_log() {
        let mut log = TransitionLog::new();
        for _ in 0..3 {
            log.observe(&at(Phase::Lobby, 0), &at(Phase::Roles, 1), "StartGame");
            log.observe(&at(Phase::Sentence, 1), &at(Phase::Results, 1), "SelectWinner");
            log.observe(&at(Phase::Results, 1), &at(Phase::Gameover, 1), "AdvancePhase");
            assert_eq!(log.len(), 3);
            log.observe(&at(Phase::Gameover, 1), &at(Phase::Lobby, 0), "RestartGame");
            assert!(log.is_empty());
        }
    }
}
