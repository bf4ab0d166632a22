//! Router tests against a single node without a peer.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use duet_server::{AppState, StateHolder, router};
use duet_tictactoe::{Cell, GameState, Player};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn send(holder: &StateHolder, request: Request<Body>) -> (StatusCode, String) {
    let app = router(AppState::new(holder.clone()));
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, json: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn played(cells: &[Cell]) -> GameState {
    cells
        .iter()
        .try_fold(GameState::new(), |state, cell| state.apply(*cell))
        .unwrap()
}

#[tokio::test]
async fn test_move_success() {
    let holder = StateHolder::new(Player::X);
    let (status, body) = send(&holder, post("/api/game/move?cell=MC")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Move successful");
    assert_eq!(holder.get().version(), 1);
}

#[tokio::test]
async fn test_move_accepts_long_cell_name() {
    let holder = StateHolder::new(Player::X);
    let (status, _) = send(&holder, post("/api/game/move?cell=TOP_LEFT")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(holder.get().board().get(Cell::TopLeft).player(), Some(Player::X));
}

#[tokio::test]
async fn test_winning_move_message() {
    let holder = StateHolder::with_state(
        Player::X,
        played(&[Cell::TopLeft, Cell::Center, Cell::TopCenter, Cell::MiddleLeft]),
    );
    let (status, body) = send(&holder, post("/api/game/move?cell=TR")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Move successful. Player X wins!");
}

#[tokio::test]
async fn test_draw_move_message() {
    let holder = StateHolder::with_state(
        Player::X,
        played(&[
            Cell::TopLeft,
            Cell::TopCenter,
            Cell::TopRight,
            Cell::MiddleLeft,
            Cell::MiddleRight,
            Cell::Center,
            Cell::BottomLeft,
            Cell::BottomRight,
        ]),
    );
    let (status, body) = send(&holder, post("/api/game/move?cell=BC")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Move successful. The game is a draw!");
}

#[tokio::test]
async fn test_out_of_turn_is_bad_request() {
    let holder = StateHolder::new(Player::O);
    let (status, body) = send(&holder, post("/api/game/move?cell=TL")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("It's not your turn."), "{body}");
}

#[tokio::test]
async fn test_occupied_is_bad_request() {
    let holder = StateHolder::with_state(Player::X, played(&[Cell::TopLeft, Cell::Center]));
    let (status, body) = send(&holder, post("/api/game/move?cell=MC")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Cell is already occupied: MC");
}

#[tokio::test]
async fn test_unknown_and_missing_cell() {
    let holder = StateHolder::new(Player::X);
    let (status, body) = send(&holder, post("/api/game/move?cell=ZZ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Invalid cell"), "{body}");

    let (status, _) = send(&holder, post("/api/game/move")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(holder.get(), GameState::new());
}

#[tokio::test]
async fn test_get_state_json() {
    let holder = StateHolder::with_state(Player::X, played(&[Cell::TopLeft]));
    let (status, body) = send(&holder, get("/api/game/state")).await;
    assert_eq!(status, StatusCode::OK);

    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["board"]["TL"], "X");
    assert_eq!(value["board"]["BR"], "EMPTY");
    assert_eq!(value["currentPlayer"], "O");
    assert_eq!(value["lastPlayer"], "X");
    assert_eq!(value["gameOver"], false);
    assert_eq!(value["winner"], "EMPTY");
    assert_eq!(value["version"], 1);
}

#[tokio::test]
async fn test_set_state_is_version_gated() {
    let holder = StateHolder::with_state(Player::X, played(&[Cell::TopLeft, Cell::Center]));

    let older = serde_json::to_string(&played(&[Cell::TopRight])).unwrap();
    let (status, body) = send(&holder, post_json("/api/game/state", older)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Game state updated successfully");
    assert_eq!(holder.get().version(), 2);

    let newer_state = played(&[Cell::TopLeft, Cell::Center, Cell::BottomRight]);
    let newer = serde_json::to_string(&newer_state).unwrap();
    let (status, _) = send(&holder, post_json("/api/game/state", newer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(holder.get(), newer_state);
}

#[tokio::test]
async fn test_set_state_rejects_malformed_body() {
    let holder = StateHolder::new(Player::X);
    let (status, _) = send(
        &holder,
        post_json("/api/game/state", "{\"board\":42}".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_state_rejects_impossible_state() {
    let holder = StateHolder::new(Player::X);
    let json = r#"{
        "board": {"TL":"X","TC":"X","TR":"X","ML":"EMPTY","MC":"EMPTY",
                  "MR":"EMPTY","BL":"EMPTY","BC":"EMPTY","BR":"EMPTY"},
        "currentPlayer":"O","lastPlayer":"X","gameOver":true,"winner":"X","version":99
    }"#;
    let (status, body) = send(&holder, post_json("/api/game/state", json.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Invalid game state"), "{body}");
    assert_eq!(holder.get(), GameState::new());
}

#[tokio::test]
async fn test_reset() {
    let holder = StateHolder::with_state(Player::X, played(&[Cell::TopLeft, Cell::Center]));
    let (status, body) = send(&holder, post("/api/game/reset")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Game has been reset");

    let state = holder.get();
    assert!(state.is_fresh());
    assert_eq!(state.version(), 3);
}

fn fresh_at_version(version: u64) -> String {
    let mut value = serde_json::to_value(GameState::new()).unwrap();
    value["version"] = version.into();
    value.to_string()
}

#[tokio::test]
async fn test_set_state_rejects_exhausted_version() {
    let holder = StateHolder::new(Player::X);
    let (status, body) = send(
        &holder,
        post_json("/api/game/state", fresh_at_version(u64::MAX)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("exhausted"), "{body}");
    assert_eq!(holder.get(), GameState::new());
}

#[tokio::test]
async fn test_version_limit_fails_without_panicking() {
    let holder = StateHolder::new(Player::X);
    let (status, _) = send(
        &holder,
        post_json("/api/game/state", fresh_at_version(u64::MAX - 1)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&holder, post("/api/game/move?cell=TL")).await;
    assert_eq!(status, StatusCode::OK);
    let last = holder.get();
    assert_eq!(last.version(), u64::MAX);

    let (status, body) = send(&holder, post("/api/game/reset")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "An unexpected error occurred");
    assert_eq!(holder.get(), last);
}
