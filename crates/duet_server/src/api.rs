//! REST surface under `/api/game`.

use crate::error::ApiError;
use crate::holder::StateHolder;
use crate::sync::SyncEngine;
use axum::body::Body;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::Request;
use axum::routing::{get, post};
use axum::{Json, Router};
use duet_tictactoe::{Cell, GameState, Outcome};
use serde::Deserialize;
use tower::ServiceBuilder;
use tracing::{info, instrument};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    holder: StateHolder,
    /// Present when local mutations should be followed by a sync tick.
    eager_sync: Option<SyncEngine>,
}

impl AppState {
    /// Creates handler state without eager sync.
    pub fn new(holder: StateHolder) -> Self {
        Self {
            holder,
            eager_sync: None,
        }
    }

    /// Runs a tick on `engine` after each successful move or reset.
    pub fn with_eager_sync(mut self, engine: SyncEngine) -> Self {
        self.eager_sync = Some(engine);
        self
    }

    async fn after_mutation(&self) {
        if let Some(engine) = &self.eager_sync {
            let outcome = engine.tick().await;
            info!(?outcome, "Synced after local mutation");
        }
    }
}

/// Query parameters of `POST /api/game/move`.
#[derive(Debug, Deserialize)]
pub struct MoveParams {
    cell: Cell,
}

/// Builds the node's router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/game/move", post(make_move))
        .route("/api/game/reset", post(reset_game))
        .route("/api/game/state", get(get_state).post(set_state))
        .layer(ServiceBuilder::new().map_request(log_request))
        .with_state(state)
}

fn log_request(req: Request<Body>) -> Request<Body> {
    info!(
        method = %req.method(),
        uri = %req.uri(),
        "Incoming HTTP request"
    );
    req
}

#[instrument(skip_all)]
async fn make_move(
    State(app): State<AppState>,
    params: Result<Query<MoveParams>, QueryRejection>,
) -> Result<String, ApiError> {
    let Query(MoveParams { cell }) =
        params.map_err(|r| ApiError::InvalidRequest(format!("Invalid cell: {}", r.body_text())))?;
    info!(%cell, "Move requested");

    let state = app.holder.try_apply_local_move(cell)?;
    app.after_mutation().await;

    Ok(match state.outcome() {
        Outcome::InProgress => "Move successful".to_string(),
        Outcome::Won(player) => format!("Move successful. Player {player} wins!"),
        Outcome::Draw => "Move successful. The game is a draw!".to_string(),
    })
}

#[instrument(skip_all)]
async fn reset_game(State(app): State<AppState>) -> Result<&'static str, ApiError> {
    let state = app.holder.reset()?;
    info!(version = state.version(), "Reset requested");
    app.after_mutation().await;
    Ok("Game has been reset")
}

#[instrument(skip_all)]
async fn get_state(State(app): State<AppState>) -> Json<GameState> {
    Json(app.holder.get())
}

#[instrument(skip_all)]
async fn set_state(
    State(app): State<AppState>,
    payload: Result<Json<GameState>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let Json(state) = payload.map_err(|r| ApiError::InvalidRequest(r.body_text()))?;
    state
        .check_invariants()
        .map_err(|violation| ApiError::InvalidRequest(violation.to_string()))?;

    let applied = app.holder.replace(state);
    info!(applied, "State received from peer");
    Ok("Game state updated successfully")
}
