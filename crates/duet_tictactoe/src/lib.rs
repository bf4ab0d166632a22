//! Duet tic-tac-toe - pure game logic for a two-node replicated game
//!
//! This crate has no I/O. It provides:
//!
//! - **Types**: [`Player`], [`Square`], [`Cell`], [`Board`]
//! - **State**: [`GameState`], a versioned snapshot with a pure transition
//!   function ([`GameState::apply`]) and an invariant checker
//! - **Turn gate**: [`TurnGate`], which admits moves for one assigned player
//! - **Rules**: win and draw detection in [`rules`]
//!
//! # Example
//!
//! ```
//! use duet_tictactoe::{Cell, GameState, Outcome, Player};
//!
//! let state = [Cell::TopLeft, Cell::Center, Cell::TopCenter, Cell::MiddleLeft, Cell::TopRight]
//!     .into_iter()
//!     .try_fold(GameState::new(), |state, cell| state.apply(cell))
//!     .unwrap();
//!
//! assert_eq!(state.outcome(), Outcome::Won(Player::X));
//! assert_eq!(state.version(), 5);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod gate;
pub mod rules;
mod state;
mod types;
mod wire;

pub use error::{InvariantViolation, MoveError};
pub use gate::TurnGate;
pub use state::{GameState, Outcome};
pub use types::{Board, Cell, Player, Square};
