//! Wires configuration, state, sync task and HTTP server into one running node.

use crate::api::{AppState, router};
use crate::config::NodeConfig;
use crate::error::PeerError;
use crate::holder::StateHolder;
use crate::peer::HttpPeerClient;
use crate::sync::SyncEngine;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// One replica: its state holder, its sync engine and its router.
#[derive(Debug, Clone)]
pub struct Node {
    config: NodeConfig,
    holder: StateHolder,
    sync: SyncEngine,
}

impl Node {
    /// Builds a node at the starting position with an HTTP peer client.
    #[instrument(skip(config), fields(port = *config.server_port()))]
    pub fn new(config: NodeConfig) -> Result<Self, PeerError> {
        let holder = StateHolder::new(config.assigned_player());
        let peer = HttpPeerClient::new(config.peer_state_url(), *config.sync_interval())?;
        let sync = SyncEngine::new(holder.clone(), Arc::new(peer), *config.sync_interval());
        Ok(Self {
            config,
            holder,
            sync,
        })
    }

    /// The node's state holder.
    pub fn holder(&self) -> &StateHolder {
        &self.holder
    }

    /// The node's HTTP router.
    pub fn router(&self) -> Router {
        let state = AppState::new(self.holder.clone());
        let state = if *self.config.sync_on_mutation() {
            state.with_eager_sync(self.sync.clone())
        } else {
            state
        };
        router(state)
    }

    /// Serves on `listener` with the sync loop running until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(
            %addr,
            player = %self.holder.assigned_player(),
            peer = %self.config.peer_state_url(),
            "Node listening"
        );

        let app = self.router();
        let sync_task = self.sync.clone().spawn();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;
        sync_task.abort();
        info!(%addr, "Node stopped");
        result
    }

    /// Binds the configured address and serves until Ctrl-C.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.bind_address()).await?;
        self.serve(listener, async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => {
                    warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;
        Ok(())
    }
}
