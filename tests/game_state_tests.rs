use ludo_mcts::{
    board::{absolute_cell, FINISHED, HOME},
    roll_die, Action, Color, ExtraTurnPolicy, GameState, LudoError,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

fn game(blue: [i8; 4], red: [i8; 4], to_move: Color) -> GameState {
    GameState::new(blue, red, to_move).expect("test position should be valid")
}

fn assert_invalid_action(result: ludo_mcts::Result<ludo_mcts::MoveReport>) {
    match result {
        Err(LudoError::InvalidAction(_)) => {}
        other => panic!("expected InvalidAction, got {:?}", other),
    }
}

/// Every structural invariant a reachable state has to satisfy
fn assert_invariants(state: &GameState) {
    let rebuilt = GameState::new(
        *state.tokens(Color::Blue),
        *state.tokens(Color::Red),
        state.current_player(),
    );
    assert!(rebuilt.is_ok(), "reached invalid state {}: {:?}", state, rebuilt);

    let someone_finished = Color::ALL
        .iter()
        .any(|&color| state.tokens(color).iter().all(|&p| p == FINISHED));
    assert_eq!(state.is_terminal(), someone_finished);
}

#[test]
fn test_all_home_six_offers_every_token() {
    let state = GameState::initial(Color::Blue);

    let actions = state.get_legal_actions(6);
    assert_eq!(
        actions,
        vec![
            Action::new(0, 0),
            Action::new(1, 0),
            Action::new(2, 0),
            Action::new(3, 0)
        ]
    );
}

#[test]
fn test_all_home_needs_a_six() {
    for color in Color::ALL {
        let state = GameState::initial(color);
        for roll in 1..=5 {
            assert!(
                state.get_legal_actions(roll).is_empty(),
                "{} should not leave home on a {}",
                color,
                roll
            );
        }
    }
}

#[test]
fn test_out_of_range_rolls_have_no_moves() {
    let state = game([5, -1, -1, -1], [-1; 4], Color::Blue);
    assert!(state.get_legal_actions(0).is_empty());
    assert!(state.get_legal_actions(7).is_empty());
}

#[test]
fn test_entry_blocked_by_own_token() {
    let state = game([0, -1, -1, -1], [-1; 4], Color::Blue);

    assert_eq!(state.get_legal_actions(6), vec![Action::new(0, 6)]);
}

#[test]
fn test_no_landing_on_own_token() {
    let state = game([5, 8, -1, -1], [-1; 4], Color::Blue);

    assert_eq!(state.get_legal_actions(3), vec![Action::new(1, 11)]);
}

#[test]
fn test_overshooting_finish_is_illegal() {
    let state = game([41, -1, -1, -1], [-1; 4], Color::Blue);

    assert!(state.get_legal_actions(3).is_empty());
    assert_eq!(state.get_legal_actions(2), vec![Action::new(0, FINISHED)]);
    assert_eq!(state.get_legal_actions(1), vec![Action::new(0, 42)]);
}

#[test]
fn test_finished_tokens_share_the_terminal_slot() {
    let state = game([43, 40, -1, -1], [-1; 4], Color::Blue);
    assert_eq!(state.get_legal_actions(3), vec![Action::new(1, FINISHED)]);

    // A non-terminal finish slot is exclusive
    let blocked = game([42, 40, -1, -1], [-1; 4], Color::Blue);
    assert!(blocked.get_legal_actions(2).is_empty());
}

#[test]
fn test_finished_token_never_moves() {
    let state = game([43, -1, -1, -1], [-1; 4], Color::Blue);
    for roll in 1..=5 {
        assert!(state.get_legal_actions(roll).is_empty());
    }
}

#[test]
fn test_entering_captures_token_on_entry_cell() {
    // Red's relative 20 wraps around to Blue's entry cell
    let mut state = game([-1; 4], [20, -1, -1, -1], Color::Blue);

    let report = state.apply_action(Action::new(0, 0)).unwrap();

    assert_eq!(report.captured, Some(0));
    assert_eq!(state.tokens(Color::Red)[0], HOME);
    assert_eq!(state.tokens(Color::Blue)[0], 0);
}

#[test]
fn test_capture_on_shared_track() {
    // Blue 35 -> 39 lands on Red's relative 19
    let mut state = game([35, -1, -1, -1], [19, 4, -1, -1], Color::Blue);

    let report = state.apply_action(Action::new(0, 39)).unwrap();

    assert_eq!(report.roll, 4);
    assert_eq!(report.captured, Some(0));
    assert_eq!(state.tokens(Color::Blue)[0], 39);
    assert_eq!(state.tokens(Color::Red), &[HOME, 4, HOME, HOME]);
}

#[test]
fn test_red_captures_across_the_wrap() {
    // Red relative 18 is cell 38; four steps later it is cell 2
    let mut state = game([2, -1, -1, -1], [18, -1, -1, -1], Color::Red);

    let report = state.apply_action(Action::new(0, 22)).unwrap();

    assert_eq!(report.captured, Some(0));
    assert_eq!(state.tokens(Color::Blue)[0], HOME);
    assert_eq!(state.tokens(Color::Red)[0], 22);
    assert_eq!(state.current_player(), Color::Blue);
}

#[test]
fn test_finish_lane_is_safe() {
    // Relative 41 would be cell 1 if it were on the track
    let mut state = game([38, -1, -1, -1], [21, -1, -1, -1], Color::Blue);

    let report = state.apply_action(Action::new(0, 41)).unwrap();

    assert_eq!(report.captured, None);
    assert_eq!(state.tokens(Color::Red)[0], 21);
}

#[test]
fn test_turn_alternates_by_default() {
    let mut state = GameState::initial(Color::Blue);
    assert_eq!(state.extra_turn_policy(), ExtraTurnPolicy::Never);

    let report = state.apply_action(Action::new(0, 0)).unwrap();

    assert!(!report.extra_turn);
    assert_eq!(state.current_player(), Color::Red);
}

#[test]
fn test_six_grants_extra_turn() {
    let mut state = GameState::initial(Color::Blue).with_extra_turn_policy(ExtraTurnPolicy::OnSix);

    let report = state.apply_action(Action::new(0, 0)).unwrap();
    assert!(report.extra_turn);
    assert_eq!(state.current_player(), Color::Blue);

    let report = state.apply_action(Action::new(0, 3)).unwrap();
    assert!(!report.extra_turn);
    assert_eq!(state.current_player(), Color::Red);
}

#[test]
fn test_capture_grants_extra_turn_only_when_configured() {
    let base = game([35, -1, -1, -1], [19, -1, -1, -1], Color::Blue);

    let mut on_six = base.clone().with_extra_turn_policy(ExtraTurnPolicy::OnSix);
    on_six.apply_action(Action::new(0, 39)).unwrap();
    assert_eq!(on_six.current_player(), Color::Red);

    let mut on_capture = base.with_extra_turn_policy(ExtraTurnPolicy::OnSixOrCapture);
    let report = on_capture.apply_action(Action::new(0, 39)).unwrap();
    assert!(report.extra_turn);
    assert_eq!(on_capture.current_player(), Color::Blue);
}

#[test]
fn test_pass_turn() {
    let mut state = GameState::initial(Color::Blue);
    assert!(state.get_legal_actions(2).is_empty());

    state.pass_turn();
    assert_eq!(state.current_player(), Color::Red);
    assert_eq!(state.tokens(Color::Blue), &[HOME; 4]);
}

#[test]
fn test_apply_rejects_bad_token_index() {
    let mut state = GameState::initial(Color::Blue);
    assert_invalid_action(state.apply_action(Action::new(4, 0)));
}

#[test]
fn test_apply_rejects_illegal_actions() {
    let original = game([5, -1, 43, 8], [-1; 4], Color::Blue);

    let illegal = [
        // home token must enter at the entry cell
        Action::new(1, 3),
        // lands on own token
        Action::new(0, 8),
        // farther than one die
        Action::new(0, 12),
        // backwards
        Action::new(0, 4),
        // finished token
        Action::new(2, 44),
    ];

    for action in illegal {
        let mut state = original.clone();
        assert_invalid_action(state.apply_action(action));
        assert_eq!(state, original, "{} must leave the state untouched", action);
    }
}

#[test]
fn test_apply_rejects_entry_onto_own_token() {
    let mut state = game([0, -1, -1, -1], [-1; 4], Color::Blue);
    assert_invalid_action(state.apply_action(Action::new(1, 0)));
}

#[test]
fn test_terminal_and_winner() {
    let blue_won = game([43, 43, 43, 43], [5, -1, -1, -1], Color::Red);
    assert!(blue_won.is_terminal());
    assert_eq!(blue_won.winner(), Some(Color::Blue));

    let red_won = game([10, -1, -1, -1], [43, 43, 43, 43], Color::Blue);
    assert_eq!(red_won.winner(), Some(Color::Red));

    let almost = game([43, 43, 43, 42], [-1; 4], Color::Blue);
    assert!(!almost.is_terminal());
    assert_eq!(almost.winner(), None);
}

#[test]
fn test_finishing_move_ends_game() {
    let mut state = game([43, 43, 43, 42], [-1; 4], Color::Blue);

    state.apply_action(Action::new(3, FINISHED)).unwrap();

    assert!(state.is_terminal());
    assert_eq!(state.winner(), Some(Color::Blue));
}

#[test]
fn test_constructor_validation() {
    let invalid = [
        ([44, -1, -1, -1], [-1; 4]),
        ([-2, -1, -1, -1], [-1; 4]),
        ([5, 5, -1, -1], [-1; 4]),
        ([41, 41, -1, -1], [-1; 4]),
        ([25, -1, -1, -1], [5, -1, -1, -1]),
    ];
    for (blue, red) in invalid {
        match GameState::new(blue, red, Color::Blue) {
            Err(LudoError::InvalidArgument(_)) => {}
            other => panic!("{:?} / {:?} should be rejected, got {:?}", blue, red, other),
        }
    }

    assert!(GameState::new([43, 43, 43, 43], [-1; 4], Color::Blue).is_ok());
    assert!(GameState::new([-1, -1, 40, 41], [40, 41, 42, 43], Color::Red).is_ok());
}

#[test]
fn test_clone_is_independent() {
    let original = GameState::initial(Color::Blue);
    let mut copy = original.clone();

    copy.apply_action(Action::new(2, 0)).unwrap();

    assert_eq!(original.tokens(Color::Blue), &[HOME; 4]);
    assert_eq!(original.current_player(), Color::Blue);
    assert_ne!(copy, original);
}

#[test]
fn test_remaining_steps_and_has_any_move() {
    let initial = GameState::initial(Color::Blue);
    assert_eq!(initial.remaining_steps(Color::Blue), 176);
    assert!(initial.has_any_move());

    let state = game([43, 43, 43, 40], [-1; 4], Color::Blue);
    assert_eq!(state.remaining_steps(Color::Blue), 3);
}

#[test]
fn test_random_games_preserve_invariants() {
    let policies = [
        ExtraTurnPolicy::Never,
        ExtraTurnPolicy::OnSix,
        ExtraTurnPolicy::OnSixOrCapture,
    ];
    let mut rng = StdRng::seed_from_u64(2024);

    for game in 0..150 {
        let starting = Color::ALL[game % 2];
        let mut state =
            GameState::initial(starting).with_extra_turn_policy(policies[game % policies.len()]);

        for _ in 0..2_000 {
            assert_invariants(&state);
            if state.is_terminal() {
                break;
            }

            let mover = state.current_player();
            let opponent = mover.opponent();

            for roll in 1..=6 {
                for action in state.get_legal_actions(roll) {
                    let own = state.tokens(mover);

                    if own[action.token_index] == HOME {
                        assert_eq!(roll, 6, "tokens only leave home on a six");
                        assert_eq!(action.target, 0);
                    }

                    if action.target != FINISHED {
                        assert!(
                            own.iter()
                                .enumerate()
                                .all(|(i, &p)| i == action.token_index || p != action.target),
                            "{} lands on an own token in {}",
                            action,
                            state
                        );
                    }

                    let victim = absolute_cell(mover, action.target).and_then(|cell| {
                        state
                            .tokens(opponent)
                            .iter()
                            .position(|&p| absolute_cell(opponent, p) == Some(cell))
                    });

                    let mut next = state.clone();
                    let report = next
                        .apply_action(action)
                        .expect("a listed action must apply");

                    assert_eq!(report.roll, roll);
                    assert_eq!(report.captured, victim);
                    assert_eq!(next.tokens(mover)[action.token_index], action.target);
                    if let Some(j) = victim {
                        assert_eq!(next.tokens(opponent)[j], HOME);
                    }
                    assert_invariants(&next);
                }
            }

            let roll = roll_die(&mut rng);
            match state.get_legal_actions(roll).choose(&mut rng) {
                Some(&action) => {
                    state.apply_action(action).unwrap();
                }
                None => state.pass_turn(),
            }
        }
    }
}
