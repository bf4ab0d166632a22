//! Duet server: one node of a two-node replicated tic-tac-toe game.
//!
//! Each node owns one player identity, serves the REST API for that player
//! and periodically reconciles its game state with the peer node:
//!
//! - [`StateHolder`] guards the single current state and applies the
//!   version-ordered merge rule.
//! - [`SyncEngine`] pulls the peer state, then adopts it, pushes ours or
//!   flags a divergence.
//! - [`router`] exposes move, reset and state endpoints under `/api/game`.
//! - [`Node`] wires these together and runs the server and sync loop.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod cli;
mod config;
mod error;
mod holder;
mod node;
mod peer;
mod sync;

pub use api::{AppState, MoveParams, router};
pub use cli::{Cli, ConfigOverrides};
pub use config::{NodeConfig, STATE_PATH, X_PORT};
pub use error::{ApiError, ConfigError, PeerError};
pub use holder::{StateHolder, SyncAction};
pub use node::Node;
pub use peer::{HttpPeerClient, PeerClient};
pub use sync::{SyncEngine, SyncOutcome};
