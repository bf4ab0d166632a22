//! Error types for the node: API errors, peer errors and configuration errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error};
use duet_tictactoe::MoveError;
use tracing::{error, instrument, warn};

/// Body returned for internal failures; details go to the log only.
const INTERNAL_ERROR_BODY: &str = "An unexpected error occurred";

/// Error kinds surfaced to HTTP callers.
///
/// This is the one place error kinds map to status codes.
#[derive(Debug, Display, Error)]
pub enum ApiError {
    /// Move rejected by the turn gate or the board engine.
    #[display("{_0}")]
    Move(MoveError),

    /// Unparseable cell, malformed JSON or an impossible game state.
    #[display("{_0}")]
    InvalidRequest(#[error(not(source))] String),

    /// Anything unexpected.
    #[display("Internal error: {_0}")]
    Internal(#[error(not(source))] String),
}

impl ApiError {
    /// Status code for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Move(_) | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MoveError> for ApiError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::VersionExhausted => ApiError::Internal(err.to_string()),
            other => ApiError::Move(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Move(err) => {
                warn!(error = %err, "Illegal move attempt");
                (status, err.to_string()).into_response()
            }
            ApiError::InvalidRequest(message) => {
                warn!(message = %message, "Invalid request");
                (status, message).into_response()
            }
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Unexpected error");
                (status, INTERNAL_ERROR_BODY).into_response()
            }
        }
    }
}

/// Failure talking to the peer node.
#[derive(Debug, Display, Error)]
pub enum PeerError {
    /// The HTTP exchange failed: connect, timeout, non-2xx status or body decode.
    #[display("Request to peer at {url} failed: {source}")]
    Request {
        /// Peer endpoint.
        url: String,
        /// Underlying client error.
        source: reqwest::Error,
    },

    /// Stand-in failure for in-memory peers.
    #[cfg(test)]
    #[display("Peer unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
