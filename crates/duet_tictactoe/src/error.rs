//! Error types for move validation and state checking.

use crate::types::{Cell, Player};

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// The node's assigned player is not the one to move.
    #[display("It's not your turn. Waiting for player {current}, this node plays {assigned}")]
    NotYourTurn {
        /// Player whose turn it is.
        current: Player,
        /// Player this node moves for.
        assigned: Player,
    },

    /// The target cell already holds a mark.
    #[display("Cell is already occupied: {_0}")]
    CellOccupied(#[error(not(source))] Cell),

    /// The game has already ended.
    #[display("Game is already over.")]
    GameOver,

    /// The version counter cannot be bumped any further.
    #[display("Game version counter is exhausted")]
    VersionExhausted,
}

/// A game state that breaks one of the board invariants.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid game state: {reason}")]
pub struct InvariantViolation {
    /// Which rule is broken.
    pub reason: String,
}

impl InvariantViolation {
    /// Creates a violation with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_api_contract() {
        let turn = MoveError::NotYourTurn {
            current: Player::O,
            assigned: Player::X,
        };
        assert!(turn.to_string().starts_with("It's not your turn."));
        assert!(
            MoveError::CellOccupied(Cell::TopLeft)
                .to_string()
                .contains("occupied")
        );
        assert!(MoveError::GameOver.to_string().contains("Game is already over"));
    }
}
