//! Round lifecycle scenarios: lobby through game over and back, driven only
//! through `transition` with seeded RNGs.

use std::sync::Arc;

use ghg_game::{
    transition, Action, GameState, Phase, RoomSettings, Team, TopicMode, DEBATE_SECONDS,
    DEFAULT_TARGET_SCORE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn add(state: &Arc<GameState>, id: &str, rng: &mut StdRng) -> Arc<GameState> {
    transition(
        state,
        &Action::AddPlayer {
            player_id: id.to_string(),
            name: format!("Player {id}"),
        },
        rng,
    )
}

fn three_player_lobby(rng: &mut StdRng) -> Arc<GameState> {
    let mut state = Arc::new(GameState::default());
    for id in ["P1", "P2", "P3"] {
        state = add(&state, id, rng);
    }
    state
}

// ── Lobby to roles ─────────────────────────────────────────────────

#[test]
fn test_three_players_start_game() {
    let mut rng = StdRng::seed_from_u64(1);
    let lobby = three_player_lobby(&mut rng);
    assert!(lobby.player("P1").unwrap().is_host);

    let state = transition(&lobby, &Action::StartGame, &mut rng);
    assert_eq!(state.phase, Phase::Roles);

    let judge = state.judge_id.clone().expect("judge assigned");
    assert!(["P1", "P2", "P3"].contains(&judge.as_str()));
    assert_eq!(state.accuser_ids.len(), 1);
    assert_eq!(state.defender_ids.len(), 1);
    assert_ne!(state.accuser_ids[0], state.defender_ids[0]);
    assert!(!state.accuser_ids.contains(&judge));
    assert!(!state.defender_ids.contains(&judge));
}

// ── Timer ──────────────────────────────────────────────────────────

#[test]
fn test_last_tick_stops_timer() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut state = (*three_player_lobby(&mut rng)).clone();
    state.phase = Phase::Debate;
    state.time_left = 1;
    state.timer_running = true;

    let next = transition(&Arc::new(state), &Action::Tick, &mut rng);
    assert_eq!(next.time_left, 0);
    assert!(!next.timer_running);
}

// ── Sentencing ─────────────────────────────────────────────────────

#[test]
fn test_defenders_win_round() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = (*three_player_lobby(&mut rng)).clone();
    state.phase = Phase::Sentence;
    state.current_round = 1;
    state.defender_ids = vec!["P2".into()];
    state.accuser_ids = vec!["P1".into()];
    state.judge_id = Some("P3".into());

    let next = transition(
        &Arc::new(state),
        &Action::SelectWinner {
            team: Team::Defenders,
        },
        &mut rng,
    );
    assert_eq!(next.player("P2").unwrap().score, 1);
    assert_eq!(next.player("P1").unwrap().score, 0);
    assert_eq!(next.round_winner, Some(Team::Defenders));
    assert_eq!(next.phase, Phase::Results);
}

#[test]
fn test_accusers_both_score() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut state = Arc::new(GameState::default());
    for id in ["A", "B", "C", "J"] {
        state = add(&state, id, &mut rng);
    }
    let mut s = (*state).clone();
    s.phase = Phase::Sentence;
    s.accuser_ids = vec!["A".into(), "B".into()];
    s.defender_ids = vec!["C".into()];
    s.judge_id = Some("J".into());

    let next = transition(
        &Arc::new(s),
        &Action::SelectWinner {
            team: Team::Accusers,
        },
        &mut rng,
    );
    assert_eq!(next.player("A").unwrap().score, 1);
    assert_eq!(next.player("B").unwrap().score, 1);
    assert_eq!(next.player("C").unwrap().score, 0);
    assert_eq!(next.player("J").unwrap().score, 0);
}

// ── Win detection ──────────────────────────────────────────────────

#[test]
fn test_reaching_target_ends_game_on_next_advance() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut state = (*three_player_lobby(&mut rng)).clone();
    state.phase = Phase::Sentence;
    state.current_round = 4;
    state.target_score = 5;
    state.players[1].score = 4;
    state.defender_ids = vec!["P2".into()];
    state.accuser_ids = vec!["P1".into()];
    state.judge_id = Some("P3".into());

    let results = transition(
        &Arc::new(state),
        &Action::SelectWinner {
            team: Team::Defenders,
        },
        &mut rng,
    );
    assert_eq!(results.player("P2").unwrap().score, 5);
    assert_eq!(results.phase, Phase::Results);

    let over = transition(&results, &Action::AdvancePhase, &mut rng);
    assert_eq!(over.phase, Phase::Gameover);
    assert_eq!(over.game_winner_id.as_deref(), Some("P2"));

    // Terminal: advancing does nothing.
    let still = transition(&over, &Action::AdvancePhase, &mut rng);
    assert!(Arc::ptr_eq(&over, &still));
}

// ── Full game ──────────────────────────────────────────────────────

#[test]
fn test_full_game_reaches_gameover_and_restarts() {
    let mut rng = StdRng::seed_from_u64(6);
    let settings = RoomSettings {
        topic_mode: TopicMode::Hybrid,
        custom_topics: vec!["Cereal is a soup".into(), "Socks with sandals".into()],
        target_score: 3,
    };
    let mut state = Arc::new(settings.initial_state());
    for id in ["P1", "P2", "P3", "P4", "P5"] {
        state = add(&state, id, &mut rng);
    }
    state = transition(&state, &Action::StartGame, &mut rng);

    let mut rounds = 0;
    let mut previous_judge = state.judge_id.clone();
    while state.phase != Phase::Gameover {
        assert_eq!(state.phase, Phase::Roles);
        rounds += 1;
        assert!(rounds < 50, "game did not terminate");

        state = transition(&state, &Action::AdvancePhase, &mut rng);
        assert_eq!(state.phase, Phase::Topic);
        assert!(!state.topic.is_empty());

        state = transition(&state, &Action::ChangeTopic, &mut rng);
        state = transition(&state, &Action::AdvancePhase, &mut rng);
        assert_eq!(state.phase, Phase::Dice);

        state = transition(&state, &Action::RollDice, &mut rng);
        assert!(state.criterion.is_some());
        state = transition(&state, &Action::AdvancePhase, &mut rng);
        assert_eq!(state.phase, Phase::Debate);
        assert_eq!(state.time_left, DEBATE_SECONDS);

        for _ in 0..DEBATE_SECONDS {
            state = transition(&state, &Action::Tick, &mut rng);
        }
        assert!(!state.timer_running);

        state = transition(&state, &Action::AdvancePhase, &mut rng);
        assert_eq!(state.phase, Phase::Sentence);

        let team = if rounds % 2 == 0 {
            Team::Accusers
        } else {
            Team::Defenders
        };
        state = transition(&state, &Action::SelectWinner { team }, &mut rng);
        assert_eq!(state.phase, Phase::Results);

        state = transition(&state, &Action::AdvancePhase, &mut rng);
        if state.phase == Phase::Roles {
            assert_ne!(state.judge_id, previous_judge);
            previous_judge = state.judge_id.clone();
        }
    }

    let winner = state.game_winner().expect("winner declared");
    assert!(winner.score >= 3);

    let lobby = transition(&state, &Action::RestartGame, &mut rng);
    assert_eq!(lobby.phase, Phase::Lobby);
    assert!(lobby.players.iter().all(|p| p.score == 0));
    assert_eq!(lobby.topic_mode, TopicMode::Hybrid);
    assert_eq!(lobby.custom_topics.len(), 2);
    assert_eq!(lobby.players.len(), 5);
    // The 3-point target does not survive a restart.
    assert_eq!(lobby.target_score, DEFAULT_TARGET_SCORE);
    assert!(lobby.game_winner_id.is_none());
}
