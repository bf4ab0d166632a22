//! Periodic pull-then-push reconciliation with the peer node.

use crate::holder::{StateHolder, SyncAction};
use crate::peer::PeerClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

/// Result of one sync tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Peer unreachable or its reply unusable.
    PullFailed,
    /// Peer sent a state that cannot occur in a real game.
    RejectedPeerState,
    /// Peer was newer; we took its state.
    Adopted,
    /// We were newer and the peer accepted our state.
    Pushed,
    /// We were newer but the push failed.
    PushFailed,
    /// Both sides identical.
    InSync,
    /// Same version, different content.
    Inconsistent,
}

/// Drives reconciliation between the local [`StateHolder`] and a [`PeerClient`].
#[derive(Debug, Clone)]
pub struct SyncEngine {
    holder: StateHolder,
    peer: Arc<dyn PeerClient>,
    interval: Duration,
}

impl SyncEngine {
    /// Creates an engine ticking every `interval`.
    pub fn new(holder: StateHolder, peer: Arc<dyn PeerClient>, interval: Duration) -> Self {
        Self {
            holder,
            peer,
            interval,
        }
    }

    /// Runs one pull, compare and (maybe) push round.
    ///
    /// Failures are logged and reported in the outcome; they never propagate.
    #[instrument(skip(self), fields(peer = %self.peer.endpoint()))]
    pub async fn tick(&self) -> SyncOutcome {
        let peer_state = match self.peer.pull().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Failed to pull state from peer");
                return SyncOutcome::PullFailed;
            }
        };

        if let Err(violation) = peer_state.check_invariants() {
            warn!(
                error = %violation,
                version = peer_state.version(),
                "Ignoring impossible peer state"
            );
            return SyncOutcome::RejectedPeerState;
        }

        // Decision uses the local state as of now, not as of when the pull started
        match self.holder.reconcile(peer_state) {
            SyncAction::Adopted => SyncOutcome::Adopted,
            SyncAction::InSync => SyncOutcome::InSync,
            SyncAction::Inconsistent => SyncOutcome::Inconsistent,
            SyncAction::Push(local) => match self.peer.push(&local).await {
                Ok(()) => SyncOutcome::Pushed,
                Err(e) => {
                    warn!(error = %e, version = local.version(), "Failed to push state to peer");
                    SyncOutcome::PushFailed
                }
            },
        }
    }

    /// Ticks forever: once immediately, then every interval. Missed ticks are skipped.
    pub async fn run(self) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            peer = %self.peer.endpoint(),
            "Starting sync loop"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let outcome = self.tick().await;
            debug!(?outcome, "Sync tick finished");
        }
    }

    /// Spawns [`SyncEngine::run`] on the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
