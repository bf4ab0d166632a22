//! Turn ownership: a node may only move for its assigned player.

use crate::error::MoveError;
use crate::state::GameState;
use crate::types::Player;
use tracing::{instrument, warn};

/// Admits local moves only when the assigned player is the one to move.
///
/// State arriving from the peer bypasses the gate; the peer already
/// checked its own moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnGate {
    assigned: Player,
}

impl TurnGate {
    /// Creates a gate for the given player.
    pub fn new(assigned: Player) -> Self {
        Self { assigned }
    }

    /// Player this gate admits moves for.
    pub fn assigned(&self) -> Player {
        self.assigned
    }

    /// Checks that `state` is waiting on the assigned player.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::NotYourTurn`] otherwise.
    #[instrument(skip(state), fields(current = %state.current_player(), assigned = %self.assigned))]
    pub fn admit(&self, state: &GameState) -> Result<(), MoveError> {
        if state.current_player() != self.assigned {
            warn!("Attempted move out of turn");
            return Err(MoveError::NotYourTurn {
                current: state.current_player(),
                assigned: self.assigned,
            });
        }
        Ok(())
    }
}
