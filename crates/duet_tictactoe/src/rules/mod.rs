//! Game rules for tic-tac-toe.
//!
//! Pure functions evaluating a board. Kept apart from the state type so the
//! invariant checker and the transition function share one definition of a
//! win and a draw.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner, completed_lines};
