//! Property-based tests for the game engine.
//!
//! States are generated by random play from the starting position so that
//! only reachable states are tested.

use duet_tictactoe::rules::{LINES, check_winner};
use duet_tictactoe::{Cell, GameState, MoveError, Player};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A random sequence of cell picks; illegal picks are skipped during play.
fn arb_picks() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..9, 0..24)
}

/// Plays the picks from a fresh game, returning every accepted state.
fn play_picks(picks: &[usize]) -> Vec<GameState> {
    let mut states = vec![GameState::new()];
    for pick in picks {
        let current = states.last().expect("never empty");
        if current.is_game_over() {
            break;
        }
        let empty = current.board().empty_cells();
        let cell = empty[pick % empty.len()];
        let next = current.apply(cell).expect("empty cell on a live game");
        states.push(next);
    }
    states
}

fn arb_reachable_state() -> impl Strategy<Value = GameState> {
    arb_picks().prop_map(|picks| play_picks(&picks).pop().expect("never empty"))
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_cell_counts_balanced(state in arb_reachable_state()) {
        let xs = state.board().count(Player::X);
        let os = state.board().count(Player::O);
        prop_assert!(xs == os || xs == os + 1, "X={} O={}", xs, os);
    }

    #[test]
    fn prop_version_counts_accepted_moves(picks in arb_picks()) {
        let states = play_picks(&picks);
        for (n, state) in states.iter().enumerate() {
            prop_assert_eq!(state.version(), n as u64);
            prop_assert_eq!(state.moves_played(), n);
        }
    }

    #[test]
    fn prop_game_over_implies_draw_or_owned_line(state in arb_reachable_state()) {
        if state.is_game_over() {
            match state.winner() {
                None => prop_assert!(state.board().empty_cells().is_empty()),
                Some(winner) => {
                    let owns_line = LINES.iter().any(|line| {
                        line.iter().all(|cell| state.board().get(*cell).player() == Some(winner))
                    });
                    prop_assert!(owns_line);
                    prop_assert_eq!(state.last_player(), Some(winner));
                }
            }
        } else {
            prop_assert_eq!(check_winner(state.board()), None);
            prop_assert!(!state.board().empty_cells().is_empty());
        }
    }

    #[test]
    fn prop_reachable_states_pass_invariant_check(state in arb_reachable_state()) {
        prop_assert!(state.check_invariants().is_ok(), "{:?}", state.check_invariants());
    }

    #[test]
    fn prop_players_alternate(state in arb_reachable_state()) {
        if let Some(last) = state.last_player() {
            prop_assert_ne!(state.current_player(), last);
        }
    }

    #[test]
    fn prop_json_roundtrip(state in arb_reachable_state()) {
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(back, state);
    }

    #[test]
    fn prop_occupied_cells_rejected(state in arb_reachable_state(), index in 0usize..9) {
        let cell = Cell::from_index(index).expect("index in range");
        let result = state.apply(cell);
        if state.is_game_over() {
            prop_assert_eq!(result, Err(MoveError::GameOver));
        } else if !state.board().is_empty(cell) {
            prop_assert_eq!(result, Err(MoveError::CellOccupied(cell)));
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
