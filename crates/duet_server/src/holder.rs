//! The node's single current game state, shared between HTTP handlers and the sync task.

use duet_tictactoe::{Cell, GameState, MoveError, Player, TurnGate};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// What [`StateHolder::reconcile`] decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Peer was newer; its state replaced ours.
    Adopted,
    /// We are newer; the caller should send this snapshot to the peer.
    Push(GameState),
    /// Same version, same content.
    InSync,
    /// Same version, different content. Local state kept.
    Inconsistent,
}

#[derive(Debug)]
struct Inner {
    state: GameState,
    last_seen_peer_version: u64,
}

/// Owns the current [`GameState`]; every mutation goes through one mutex.
///
/// The lock is never held across an `.await`. Cloning shares the same state.
#[derive(Debug, Clone)]
pub struct StateHolder {
    inner: Arc<Mutex<Inner>>,
    gate: TurnGate,
}

impl StateHolder {
    /// Creates a holder at the starting position.
    #[instrument]
    pub fn new(assigned: Player) -> Self {
        Self::with_state(assigned, GameState::new())
    }

    /// Creates a holder seeded with `state`.
    pub fn with_state(assigned: Player, state: GameState) -> Self {
        info!(%assigned, version = state.version(), "Creating state holder");
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                last_seen_peer_version: 0,
            })),
            gate: TurnGate::new(assigned),
        }
    }

    /// Player this node moves for.
    pub fn assigned_player(&self) -> Player {
        self.gate.assigned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns an independent copy of the current state.
    pub fn get(&self) -> GameState {
        self.lock().state.clone()
    }

    /// Highest version observed from the peer so far.
    pub fn last_seen_peer_version(&self) -> u64 {
        self.lock().last_seen_peer_version
    }

    /// Gates then applies a move for the assigned player; commits only on success.
    ///
    /// # Errors
    ///
    /// [`MoveError::NotYourTurn`] from the gate, or the engine's
    /// [`MoveError::CellOccupied`] / [`MoveError::GameOver`].
    #[instrument(skip(self), fields(assigned = %self.gate.assigned()))]
    pub fn try_apply_local_move(&self, cell: Cell) -> Result<GameState, MoveError> {
        let mut inner = self.lock();
        self.gate.admit(&inner.state)?;
        let next = inner.state.apply(cell)?;
        inner.state = next.clone();
        info!(version = next.version(), "Local move committed");
        debug!("\n{}", next.board().display());
        Ok(next)
    }

    /// Compares a pulled peer state with the current one and acts on it.
    #[instrument(skip(self, peer), fields(peer_version = peer.version()))]
    pub fn reconcile(&self, peer: GameState) -> SyncAction {
        let mut inner = self.lock();
        inner.last_seen_peer_version = inner.last_seen_peer_version.max(peer.version());

        let local_version = inner.state.version();
        match peer.version().cmp(&local_version) {
            std::cmp::Ordering::Greater => {
                info!(local_version, "Adopting newer peer state");
                inner.state = peer;
                SyncAction::Adopted
            }
            std::cmp::Ordering::Less => {
                debug!(local_version, "Local state is newer, pushing to peer");
                SyncAction::Push(inner.state.clone())
            }
            std::cmp::Ordering::Equal if peer == inner.state => {
                debug!("States are in sync");
                SyncAction::InSync
            }
            std::cmp::Ordering::Equal => {
                warn!(
                    version = local_version,
                    local = ?inner.state,
                    peer = ?peer,
                    "Inconsistent state detected: same version, different content"
                );
                SyncAction::Inconsistent
            }
        }
    }

    /// Replaces the current state if `new` has a strictly higher version.
    ///
    /// Returns whether the state was replaced.
    #[instrument(skip(self, new), fields(new_version = new.version()))]
    pub fn replace(&self, new: GameState) -> bool {
        let mut inner = self.lock();
        if new.version() > inner.state.version() {
            info!(old_version = inner.state.version(), "State replaced");
            inner.state = new;
            true
        } else {
            debug!(
                current_version = inner.state.version(),
                "Ignoring state that is not newer"
            );
            false
        }
    }

    /// Resets to the starting position with a version above anything seen.
    ///
    /// Resetting a starting position that is at version 0 or already ahead of
    /// every seen peer version leaves it untouched.
    ///
    /// # Errors
    ///
    /// [`MoveError::VersionExhausted`] if no higher version is left.
    #[instrument(skip(self))]
    pub fn reset(&self) -> Result<GameState, MoveError> {
        let mut inner = self.lock();
        let current = inner.state.version();
        if inner.state.is_fresh() && (current == 0 || current > inner.last_seen_peer_version) {
            debug!(version = current, "Already at starting position");
            return Ok(inner.state.clone());
        }

        let version = current
            .max(inner.last_seen_peer_version)
            .checked_add(1)
            .ok_or(MoveError::VersionExhausted)?;
        inner.state = GameState::fresh_at(version);
        info!(version, "Game reset");
        Ok(inner.state.clone())
    }
}
