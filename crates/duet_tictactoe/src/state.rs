//! Versioned game state and its transition function.
//!
//! A [`GameState`] is an immutable snapshot: [`GameState::apply`] returns the
//! successor instead of mutating in place, so callers holding a snapshot never
//! observe a half-applied move.

use crate::error::{InvariantViolation, MoveError};
use crate::rules::{check_winner, completed_lines, is_full};
use crate::types::{Board, Cell, Player, Square};
use crate::wire::optional_player;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Outcome of a game derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

/// Complete observable state of one game, as exchanged between peers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// The board.
    board: Board,
    /// Player whose move is next.
    current_player: Player,
    /// Player who made the most recent move.
    #[serde(default, with = "optional_player")]
    last_player: Option<Player>,
    /// Terminal flag.
    game_over: bool,
    /// Three-in-a-row owner, `None` while in progress or on a draw.
    #[serde(default, with = "optional_player")]
    winner: Option<Player>,
    /// Bumped on every local mutation.
    version: u64,
}

impl GameState {
    /// Creates the starting position: empty board, X to move, version 0.
    pub fn new() -> Self {
        Self::fresh_at(0)
    }

    /// Creates the starting position carrying the given version.
    pub fn fresh_at(version: u64) -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            last_player: None,
            game_over: false,
            winner: None,
            version,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the player who made the most recent move.
    pub fn last_player(&self) -> Option<Player> {
        self.last_player
    }

    /// Returns whether the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Returns the winner, if the game was won.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Returns the version counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of marks on the board.
    pub fn moves_played(&self) -> usize {
        9 - self.board.empty_cells().len()
    }

    /// Whether this is the starting position (ignoring the version).
    pub fn is_fresh(&self) -> bool {
        *self == Self::fresh_at(self.version)
    }

    /// Derives the outcome from the terminal flag and winner.
    pub fn outcome(&self) -> Outcome {
        match (self.game_over, self.winner) {
            (false, _) => Outcome::InProgress,
            (true, Some(player)) => Outcome::Won(player),
            (true, None) => Outcome::Draw,
        }
    }

    /// Places the current player's mark on `cell` and returns the successor state.
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameOver`] if the game has already ended.
    /// - [`MoveError::CellOccupied`] if the cell already holds a mark.
    /// - [`MoveError::VersionExhausted`] if the version is already `u64::MAX`.
    #[instrument(skip(self), fields(player = %self.current_player, version = self.version))]
    pub fn apply(&self, cell: Cell) -> Result<GameState, MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        if !self.board.is_empty(cell) {
            return Err(MoveError::CellOccupied(cell));
        }

        let version = self
            .version
            .checked_add(1)
            .ok_or(MoveError::VersionExhausted)?;

        let mover = self.current_player;
        let mut next = self.clone();
        next.board.set(cell, Square::Occupied(mover));
        next.last_player = Some(mover);
        next.current_player = mover.opponent();
        next.version = version;

        // Win is checked first so a last-cell line is not scored as a draw
        if let Some(winner) = check_winner(&next.board) {
            next.game_over = true;
            next.winner = Some(winner);
        } else if is_full(&next.board) {
            next.game_over = true;
            next.winner = None;
        }

        debug!(
            outcome = ?next.outcome(),
            version = next.version,
            "Move applied"
        );
        Ok(next)
    }

    /// Verifies the board invariants a reachable state must satisfy.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantViolation`] naming the first broken rule.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.version == u64::MAX {
            return Err(InvariantViolation::new("version counter is exhausted"));
        }

        let xs = self.board.count(Player::X);
        let os = self.board.count(Player::O);
        if xs != os && xs != os + 1 {
            return Err(InvariantViolation::new(format!(
                "mark counts out of balance (X={xs}, O={os})"
            )));
        }

        let expected_to_move = if xs == os { Player::X } else { Player::O };
        if self.current_player != expected_to_move {
            return Err(InvariantViolation::new(format!(
                "{} to move but board says {}",
                self.current_player, expected_to_move
            )));
        }

        let expected_last = match (xs, os) {
            (0, 0) => None,
            _ => Some(expected_to_move.opponent()),
        };
        if self.last_player != expected_last {
            return Err(InvariantViolation::new(
                "last player does not match the marks on the board",
            ));
        }

        let lines = completed_lines(&self.board);
        let owner = lines.first().map(|(player, _)| *player);
        if lines.iter().any(|(player, _)| Some(*player) != owner) {
            return Err(InvariantViolation::new("both players own a winning line"));
        }

        match (self.game_over, owner) {
            (true, Some(owner)) => {
                if self.winner != Some(owner) || self.last_player != Some(owner) {
                    return Err(InvariantViolation::new(format!(
                        "line owned by {owner} but winner is not the last mover"
                    )));
                }
            }
            (true, None) => {
                if !is_full(&self.board) {
                    return Err(InvariantViolation::new(
                        "game over without a winning line or a full board",
                    ));
                }
                if self.winner.is_some() {
                    return Err(InvariantViolation::new("winner set on a drawn board"));
                }
            }
            (false, Some(owner)) => {
                return Err(InvariantViolation::new(format!(
                    "{owner} has three in a row but the game is not over"
                )));
            }
            (false, None) => {
                if is_full(&self.board) {
                    return Err(InvariantViolation::new("board is full but the game is not over"));
                }
                if self.winner.is_some() {
                    return Err(InvariantViolation::new("winner set while in progress"));
                }
            }
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Current player: {}", self.current_player)?;
        writeln!(f, "Game over: {}", self.game_over)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "{}", self.board.display())?;
        if let Some(winner) = self.winner {
            writeln!(f, "Winner: {winner}")?;
        }
        Ok(())
    }
}
