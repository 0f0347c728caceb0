//! Game State Machine: guards and transitions for every `Action`.
//!
//! Phases advance in a single loop:
//! ```text
//! lobby → roles → topic → dice → debate → sentence → results → roles | gameover
//! gameover → lobby (RestartGame)
//! ```
//!
//! `transition` never mutates its input. It returns a new `Arc<GameState>`
//! when something changed and a clone of the input `Arc` otherwise, so
//! callers detect changes with `Arc::ptr_eq`. All randomness comes from the
//! caller's RNG, which keeps the function deterministic for a given seed and
//! makes re-applying an action against the same prior state harmless.

use std::sync::Arc;

use rand::Rng;

use crate::action::Action;
use crate::error::{GameError, GameResult};
use crate::roles::assign_roles;
use crate::state::{
    Criterion, GameState, Phase, Player, DEBATE_SECONDS, MAX_NAME_LEN, MAX_PLAYERS, MIN_PLAYERS,
};
use crate::topics::topic_for_state;

/// Trim and validate a display name.
pub fn validate_name(name: &str) -> GameResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GameError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(GameError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(trimmed.to_string())
}

fn require_phase(action: &Action, state: &GameState, allowed: &[Phase]) -> GameResult<()> {
    if allowed.contains(&state.phase) {
        Ok(())
    } else {
        Err(GameError::WrongPhase {
            action: action.name(),
            phase: state.phase,
        })
    }
}

/// Check whether `action` is allowed against `state` without applying it.
pub fn check(state: &GameState, action: &Action) -> GameResult<()> {
    match action {
        Action::AddPlayer { player_id, name } => {
            require_phase(action, state, &[Phase::Lobby])?;
            if state.players.len() >= MAX_PLAYERS {
                return Err(GameError::RosterFull { max: MAX_PLAYERS });
            }
            validate_name(name)?;
            if state.has_player(player_id) {
                return Err(GameError::DuplicatePlayer(player_id.clone()));
            }
            Ok(())
        }
        Action::RemovePlayer { player_id } => {
            if state.has_player(player_id) {
                Ok(())
            } else {
                Err(GameError::UnknownPlayer(player_id.clone()))
            }
        }
        Action::SetTargetScore { target_score } => {
            require_phase(action, state, &[Phase::Lobby])?;
            if *target_score == 0 {
                return Err(GameError::InvalidTargetScore(*target_score));
            }
            Ok(())
        }
        Action::ConfigureTopics { .. } => require_phase(action, state, &[Phase::Lobby]),
        Action::StartGame => {
            require_phase(action, state, &[Phase::Lobby])?;
            if state.players.len() < MIN_PLAYERS {
                return Err(GameError::NotEnoughPlayers {
                    have: state.players.len(),
                    need: MIN_PLAYERS,
                });
            }
            Ok(())
        }
        Action::AdvancePhase => {
            require_phase(
                action,
                state,
                &[
                    Phase::Roles,
                    Phase::Topic,
                    Phase::Dice,
                    Phase::Debate,
                    Phase::Sentence,
                    Phase::Results,
                ],
            )?;
            if state.phase == Phase::Dice && state.criterion.is_none() {
                return Err(GameError::CriterionNotRolled);
            }
            Ok(())
        }
        Action::RollDice => {
            require_phase(action, state, &[Phase::Dice])?;
            if state.criterion.is_some() {
                return Err(GameError::CriterionAlreadyRolled);
            }
            Ok(())
        }
        Action::ChangeTopic => require_phase(action, state, &[Phase::Topic]),
        Action::SelectWinner { .. } => require_phase(action, state, &[Phase::Sentence]),
        Action::RestartGame => Ok(()),
        Action::Tick => {
            if state.timer_running && state.time_left > 0 {
                Ok(())
            } else {
                Err(GameError::TimerIdle)
            }
        }
    }
}

/// Apply `action`, reporting why it was refused.
///
/// On success the returned `Arc` is the input `Arc` when the resulting state
/// is value-equal to the input.
pub fn try_transition(
    state: &Arc<GameState>,
    action: &Action,
    rng: &mut impl Rng,
) -> GameResult<Arc<GameState>> {
    check(state, action)?;

    let next = apply(state, action, rng);
    if next == **state {
        return Ok(Arc::clone(state));
    }

    if next.phase != state.phase {
        tracing::debug!(
            from = %state.phase,
            to = %next.phase,
            round = next.current_round,
            action = action.name(),
            "Phase transition"
        );
    }
    Ok(Arc::new(next))
}

/// Apply `action`; a refused action returns the input state unchanged.
pub fn transition(state: &Arc<GameState>, action: &Action, rng: &mut impl Rng) -> Arc<GameState> {
    match try_transition(state, action, rng) {
        Ok(next) => next,
        Err(e) => {
            tracing::debug!(action = action.name(), phase = %state.phase, "Action refused: {e}");
            Arc::clone(state)
        }
    }
}

/// Produce the next state. Callers must run `check` first.
fn apply(state: &GameState, action: &Action, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();

    match action {
        Action::AddPlayer { player_id, name } => {
            let mut player = Player::new(player_id.clone(), name.trim());
            player.is_host = next.players.is_empty();
            next.players.push(player);
        }
        Action::RemovePlayer { player_id } => {
            let was_host = next.player(player_id).is_some_and(|p| p.is_host);
            next.players.retain(|p| p.id != *player_id);
            next.accuser_ids.retain(|id| id != player_id);
            next.defender_ids.retain(|id| id != player_id);
            if was_host {
                if let Some(first) = next.players.first_mut() {
                    first.is_host = true;
                }
            }
        }
        Action::SetTargetScore { target_score } => {
            next.target_score = *target_score;
        }
        Action::ConfigureTopics {
            topic_mode,
            custom_topics,
        } => {
            next.topic_mode = *topic_mode;
            next.custom_topics = custom_topics.clone();
        }
        Action::StartGame => {
            next.current_round = 1;
            next.topic.clear();
            next.criterion = None;
            next.round_winner = None;
            next.game_winner_id = None;
            next.time_left = DEBATE_SECONDS;
            next.timer_running = false;
            assign_round_roles(&mut next, None, rng);
            next.phase = Phase::Roles;
        }
        Action::AdvancePhase => advance(state, &mut next, rng),
        Action::RollDice => {
            next.criterion = Some(Criterion::ALL[rng.random_range(0..Criterion::ALL.len())]);
        }
        Action::ChangeTopic => {
            next.topic = draw_fresh_topic(state, rng);
        }
        Action::SelectWinner { team } => {
            let winners = state.team_ids(*team);
            for player in next.players.iter_mut() {
                if winners.contains(&player.id) {
                    player.score += 1;
                }
            }
            next.round_winner = Some(*team);
            next.phase = Phase::Results;
        }
        Action::RestartGame => {
            next = GameState {
                players: state
                    .players
                    .iter()
                    .map(|p| Player {
                        score: 0,
                        ..p.clone()
                    })
                    .collect(),
                topic_mode: state.topic_mode,
                custom_topics: state.custom_topics.clone(),
                ..GameState::default()
            };
        }
        Action::Tick => {
            next.time_left = state.time_left.saturating_sub(1);
            if next.time_left == 0 {
                next.timer_running = false;
            }
        }
    }

    next
}

fn advance(state: &GameState, next: &mut GameState, rng: &mut impl Rng) {
    match state.phase {
        Phase::Roles => {
            next.topic = draw_fresh_topic(state, rng);
            next.phase = Phase::Topic;
        }
        Phase::Topic => {
            next.criterion = None;
            next.phase = Phase::Dice;
        }
        Phase::Dice => {
            next.time_left = DEBATE_SECONDS;
            next.timer_running = true;
            next.phase = Phase::Debate;
        }
        Phase::Debate => {
            next.timer_running = false;
            next.phase = Phase::Sentence;
        }
        Phase::Sentence => {
            next.phase = Phase::Results;
        }
        Phase::Results => {
            // First match in roster order wins ties.
            let winner = state
                .players
                .iter()
                .find(|p| p.score >= state.target_score);
            match winner {
                Some(player) => {
                    tracing::info!(
                        winner = %player.name,
                        score = player.score,
                        round = state.current_round,
                        "Game won"
                    );
                    next.game_winner_id = Some(player.id.clone());
                    next.phase = Phase::Gameover;
                }
                None => {
                    next.current_round = state.current_round + 1;
                    next.topic.clear();
                    next.criterion = None;
                    next.round_winner = None;
                    assign_round_roles(next, state.judge_id.as_deref(), rng);
                    next.phase = Phase::Roles;
                }
            }
        }
        Phase::Lobby | Phase::Gameover => {}
    }
}

fn assign_round_roles(next: &mut GameState, previous_judge: Option<&str>, rng: &mut impl Rng) {
    match assign_roles(&next.players, previous_judge, rng) {
        Some(roles) => {
            next.judge_id = Some(roles.judge_id);
            next.accuser_ids = roles.accuser_ids;
            next.defender_ids = roles.defender_ids;
        }
        None => {
            next.judge_id = None;
            next.accuser_ids.clear();
            next.defender_ids.clear();
        }
    }
}

fn draw_fresh_topic(state: &GameState, rng: &mut impl Rng) -> String {
    let exclude = (!state.topic.is_empty()).then_some(state.topic.as_str());
    topic_for_state(state, exclude, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Team, TopicMode, DEFAULT_TARGET_SCORE};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn lobby_with(ids: &[&str]) -> Arc<GameState> {
        let mut rng = rng();
        let mut state = Arc::new(GameState::default());
        for id in ids {
            state = transition(
                &state,
                &Action::AddPlayer {
                    player_id: id.to_string(),
                    name: id.to_uppercase(),
                },
                &mut rng,
            );
        }
        state
    }

    fn at_phase(phase: Phase) -> GameState {
        let mut state = (*lobby_with(&["p1", "p2", "p3"])).clone();
        state.phase = phase;
        state.current_round = 1;
        state.judge_id = Some("p3".into());
        state.accuser_ids = vec!["p1".into()];
        state.defender_ids = vec!["p2".into()];
        state
    }

    #[test]
    fn test_first_player_is_host() {
        let state = lobby_with(&["p1", "p2"]);
        assert!(state.players[0].is_host);
        assert!(!state.players[1].is_host);
    }

    #[test]
    fn test_add_player_rejects_full_room() {
        let ids: Vec<String> = (0..MAX_PLAYERS).map(|i| format!("p{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let state = lobby_with(&refs);
        assert_eq!(state.players.len(), MAX_PLAYERS);

        let err = try_transition(
            &state,
            &Action::AddPlayer {
                player_id: "late".into(),
                name: "Late".into(),
            },
            &mut rng(),
        )
        .unwrap_err();
        assert_eq!(err, GameError::RosterFull { max: MAX_PLAYERS });
    }

    #[test]
    fn test_add_player_validates_name_and_id() {
        let state = lobby_with(&["p1"]);
        let blank = Action::AddPlayer {
            player_id: "p2".into(),
            name: "   ".into(),
        };
        assert_eq!(check(&state, &blank), Err(GameError::EmptyName));

        let dup = Action::AddPlayer {
            player_id: "p1".into(),
            name: "Again".into(),
        };
        assert_eq!(
            check(&state, &dup),
            Err(GameError::DuplicatePlayer("p1".into()))
        );

        let long = Action::AddPlayer {
            player_id: "p3".into(),
            name: "x".repeat(MAX_NAME_LEN + 1),
        };
        assert_eq!(
            check(&state, &long),
            Err(GameError::NameTooLong { max: MAX_NAME_LEN })
        );
    }

    #[test]
    fn test_remove_host_promotes_earliest_remaining() {
        let state = lobby_with(&["p1", "p2", "p3"]);
        let next = transition(
            &state,
            &Action::RemovePlayer {
                player_id: "p1".into(),
            },
            &mut rng(),
        );
        assert_eq!(next.players.len(), 2);
        assert_eq!(next.host().map(|p| p.id.as_str()), Some("p2"));
        assert_eq!(next.players.iter().filter(|p| p.is_host).count(), 1);
    }

    #[test]
    fn test_remove_strips_team_membership() {
        let state = Arc::new(at_phase(Phase::Debate));
        let next = transition(
            &state,
            &Action::RemovePlayer {
                player_id: "p2".into(),
            },
            &mut rng(),
        );
        assert!(next.defender_ids.is_empty());
        assert_eq!(next.phase, Phase::Debate);
    }

    #[test]
    fn test_start_game_requires_three_players() {
        let state = lobby_with(&["p1", "p2"]);
        let next = transition(&state, &Action::StartGame, &mut rng());
        assert!(Arc::ptr_eq(&state, &next));
        assert_eq!(
            check(&state, &Action::StartGame),
            Err(GameError::NotEnoughPlayers { have: 2, need: 3 })
        );
    }

    #[test]
    fn test_start_game_assigns_roles() {
        let state = lobby_with(&["p1", "p2", "p3"]);
        let next = transition(&state, &Action::StartGame, &mut rng());
        assert_eq!(next.phase, Phase::Roles);
        assert_eq!(next.current_round, 1);
        assert!(next.judge_id.is_some());
        assert_eq!(next.accuser_ids.len(), 1);
        assert_eq!(next.defender_ids.len(), 1);
    }

    #[test]
    fn test_roles_to_topic_draws_prompt() {
        let state = Arc::new(at_phase(Phase::Roles));
        let next = transition(&state, &Action::AdvancePhase, &mut rng());
        assert_eq!(next.phase, Phase::Topic);
        assert!(!next.topic.is_empty());
    }

    #[test]
    fn test_change_topic_picks_a_different_prompt() {
        let mut state = at_phase(Phase::Topic);
        state.topic = crate::topics::STANDARD_TOPICS[0].to_string();
        let state = Arc::new(state);
        let mut rng = rng();
        for _ in 0..50 {
            let next = transition(&state, &Action::ChangeTopic, &mut rng);
            assert_ne!(next.topic, state.topic);
        }
    }

    #[test]
    fn test_topic_to_dice_clears_criterion() {
        let mut state = at_phase(Phase::Topic);
        state.criterion = Some(Criterion::Logic);
        let next = transition(&Arc::new(state), &Action::AdvancePhase, &mut rng());
        assert_eq!(next.phase, Phase::Dice);
        assert!(next.criterion.is_none());
    }

    #[test]
    fn test_dice_requires_roll_before_debate() {
        let state = Arc::new(at_phase(Phase::Dice));
        let next = transition(&state, &Action::AdvancePhase, &mut rng());
        assert!(Arc::ptr_eq(&state, &next));

        let rolled = transition(&state, &Action::RollDice, &mut rng());
        assert!(rolled.criterion.is_some());

        let debate = transition(&rolled, &Action::AdvancePhase, &mut rng());
        assert_eq!(debate.phase, Phase::Debate);
        assert_eq!(debate.time_left, DEBATE_SECONDS);
        assert!(debate.timer_running);
    }

    #[test]
    fn test_roll_dice_is_idempotent_once_rolled() {
        let state = Arc::new(at_phase(Phase::Dice));
        let rolled = transition(&state, &Action::RollDice, &mut rng());
        let again = transition(&rolled, &Action::RollDice, &mut rng());
        assert!(Arc::ptr_eq(&rolled, &again));
    }

    #[test]
    fn test_debate_to_sentence_stops_timer() {
        let mut state = at_phase(Phase::Debate);
        state.timer_running = true;
        state.time_left = 30;
        let next = transition(&Arc::new(state), &Action::AdvancePhase, &mut rng());
        assert_eq!(next.phase, Phase::Sentence);
        assert!(!next.timer_running);
        assert_eq!(next.time_left, 30);
    }

    #[test]
    fn test_select_winner_scores_team() {
        let state = Arc::new(at_phase(Phase::Sentence));
        let next = transition(
            &state,
            &Action::SelectWinner {
                team: Team::Defenders,
            },
            &mut rng(),
        );
        assert_eq!(next.player("p2").unwrap().score, 1);
        assert_eq!(next.player("p1").unwrap().score, 0);
        assert_eq!(next.player("p3").unwrap().score, 0);
        assert_eq!(next.round_winner, Some(Team::Defenders));
        assert_eq!(next.phase, Phase::Results);
    }

    #[test]
    fn test_select_winner_outside_sentence_is_refused() {
        let state = Arc::new(at_phase(Phase::Debate));
        let next = transition(
            &state,
            &Action::SelectWinner {
                team: Team::Accusers,
            },
            &mut rng(),
        );
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn test_results_starts_next_round_without_previous_judge() {
        let mut state = at_phase(Phase::Results);
        state.topic = "Old topic".into();
        state.criterion = Some(Criterion::Speed);
        state.round_winner = Some(Team::Accusers);
        let state = Arc::new(state);

        let mut rng = rng();
        for _ in 0..20 {
            let next = transition(&state, &Action::AdvancePhase, &mut rng);
            assert_eq!(next.phase, Phase::Roles);
            assert_eq!(next.current_round, 2);
            assert_ne!(next.judge_id.as_deref(), Some("p3"));
            assert!(next.topic.is_empty());
            assert!(next.criterion.is_none());
            assert!(next.round_winner.is_none());
        }
    }

    #[test]
    fn test_results_detects_winner_first_in_roster_order() {
        let mut state = at_phase(Phase::Results);
        state.target_score = 2;
        state.players[1].score = 2;
        state.players[2].score = 3;
        let next = transition(&Arc::new(state), &Action::AdvancePhase, &mut rng());
        assert_eq!(next.phase, Phase::Gameover);
        assert_eq!(next.game_winner_id.as_deref(), Some("p2"));
    }

    #[test]
    fn test_tick_counts_down_and_stops_at_zero() {
        let mut state = at_phase(Phase::Debate);
        state.timer_running = true;
        state.time_left = 2;
        let state = Arc::new(state);

        let one = transition(&state, &Action::Tick, &mut rng());
        assert_eq!(one.time_left, 1);
        assert!(one.timer_running);

        let zero = transition(&one, &Action::Tick, &mut rng());
        assert_eq!(zero.time_left, 0);
        assert!(!zero.timer_running);

        let idle = transition(&zero, &Action::Tick, &mut rng());
        assert!(Arc::ptr_eq(&zero, &idle));
    }

    #[test]
    fn test_restart_keeps_roster_and_topic_settings() {
        let mut state = at_phase(Phase::Gameover);
        state.players[0].score = 5;
        state.target_score = 10;
        state.topic_mode = TopicMode::Hybrid;
        state.custom_topics = vec!["Cereal is soup".into()];
        state.game_winner_id = Some("p1".into());
        let next = transition(&Arc::new(state), &Action::RestartGame, &mut rng());

        assert_eq!(next.phase, Phase::Lobby);
        assert_eq!(next.players.len(), 3);
        assert!(next.players.iter().all(|p| p.score == 0));
        assert!(next.players[0].is_host);
        assert_eq!(next.topic_mode, TopicMode::Hybrid);
        assert_eq!(next.custom_topics, vec!["Cereal is soup".to_string()]);
        assert!(next.game_winner_id.is_none());
        assert_eq!(next.current_round, 0);
        assert_eq!(next.target_score, DEFAULT_TARGET_SCORE);
    }

    #[test]
    fn test_noop_restart_in_fresh_lobby_keeps_reference() {
        let state = lobby_with(&["p1", "p2", "p3"]);
        let next = transition(&state, &Action::RestartGame, &mut rng());
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn test_lobby_settings_only_in_lobby() {
        let state = Arc::new(at_phase(Phase::Topic));
        let err = check(&state, &Action::SetTargetScore { target_score: 7 }).unwrap_err();
        assert!(matches!(err, GameError::WrongPhase { .. }));

        let lobby = lobby_with(&["p1"]);
        let next = transition(
            &lobby,
            &Action::SetTargetScore { target_score: 7 },
            &mut rng(),
        );
        assert_eq!(next.target_score, 7);
        assert_eq!(
            check(&lobby, &Action::SetTargetScore { target_score: 0 }),
            Err(GameError::InvalidTargetScore(0))
        );
    }

    #[test]
    fn test_configure_topics_replaces_source_in_lobby() {
        let lobby = lobby_with(&["p1"]);
        let custom = Action::ConfigureTopics {
            topic_mode: TopicMode::Custom,
            custom_topics: vec!["Pineapple belongs on pizza".into()],
        };
        let next = transition(&lobby, &custom, &mut rng());
        assert_eq!(next.topic_mode, TopicMode::Custom);
        assert_eq!(next.custom_topics, vec!["Pineapple belongs on pizza".to_string()]);
        assert_eq!(next.players, lobby.players);

        // Same settings again is a no-op.
        let again = transition(&next, &custom, &mut rng());
        assert!(Arc::ptr_eq(&next, &again));

        let back = transition(
            &next,
            &Action::ConfigureTopics {
                topic_mode: TopicMode::Standard,
                custom_topics: Vec::new(),
            },
            &mut rng(),
        );
        assert_eq!(back.topic_mode, TopicMode::Standard);
        assert!(back.custom_topics.is_empty());
    }

    #[test]
    fn test_configure_topics_refused_outside_lobby() {
        let state = Arc::new(at_phase(Phase::Debate));
        let action = Action::ConfigureTopics {
            topic_mode: TopicMode::Hybrid,
            custom_topics: vec!["Mornings are overrated".into()],
        };
        assert!(matches!(
            try_transition(&state, &action, &mut rng()),
            Err(GameError::WrongPhase { .. })
        ));
        let unchanged = transition(&state, &action, &mut rng());
        assert!(Arc::ptr_eq(&state, &unchanged));
        assert_eq!(unchanged.topic_mode, TopicMode::Standard);
    }
}
