//! Outbound client for the peer node's state endpoint.

use crate::error::PeerError;
use async_trait::async_trait;
use duet_tictactoe::GameState;
use std::time::Duration;
use tracing::{debug, instrument};

/// Access to the other node's game state.
#[async_trait]
pub trait PeerClient: Send + Sync + std::fmt::Debug {
    /// Fetches the peer's current state.
    async fn pull(&self) -> Result<GameState, PeerError>;

    /// Offers our state to the peer. The peer applies it only if it is newer.
    async fn push(&self, state: &GameState) -> Result<(), PeerError>;

    /// Human-readable peer address for logs.
    fn endpoint(&self) -> &str;
}

/// [`PeerClient`] over HTTP: `GET` and `POST` on the peer's `/api/game/state`.
#[derive(Debug, Clone)]
pub struct HttpPeerClient {
    client: reqwest::Client,
    state_url: String,
}

impl HttpPeerClient {
    /// Creates a client whose requests time out after `timeout`.
    #[instrument(skip(state_url), fields(state_url = %state_url))]
    pub fn new(state_url: String, timeout: Duration) -> Result<Self, PeerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| PeerError::Request {
                url: state_url.clone(),
                source,
            })?;
        Ok(Self { client, state_url })
    }

    fn request_error(&self, source: reqwest::Error) -> PeerError {
        PeerError::Request {
            url: self.state_url.clone(),
            source,
        }
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    #[instrument(skip(self), fields(url = %self.state_url))]
    async fn pull(&self) -> Result<GameState, PeerError> {
        let state = self
            .client
            .get(&self.state_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.request_error(e))?
            .json::<GameState>()
            .await
            .map_err(|e| self.request_error(e))?;
        debug!(version = state.version(), "Pulled peer state");
        Ok(state)
    }

    #[instrument(skip(self, state), fields(url = %self.state_url, version = state.version()))]
    async fn push(&self, state: &GameState) -> Result<(), PeerError> {
        self.client
            .post(&self.state_url)
            .json(state)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.request_error(e))?;
        debug!("Pushed state to peer");
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.state_url
    }
}
