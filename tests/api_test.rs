//! Integration tests for the REST API.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use strum::IntoEnumIterator;
use tictactoe_server::{AppState, GameMode, MoveOrchestrator, SessionManager, create_router};
use tower::ServiceExt;

fn test_app() -> Router {
    let state = AppState::new(SessionManager::new(), MoveOrchestrator::search_only());
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("{} body is not JSON ({}): {:?}", status, e, body));
    (status, json)
}

async fn new_game(app: &Router, body: Value) -> String {
    let (status, json) = send(app, Method::POST, "/api/game/new", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    json["session_id"].as_str().unwrap().to_string()
}

fn marks(board: &Value, symbol: &str) -> usize {
    board
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .filter(|cell| *cell == symbol)
        .count()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let (status, json) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_new_game_defaults_to_algorithmic() {
    let app = test_app();
    let (status, json) = send(&app, Method::POST, "/api/game/new", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["session_id"].is_string());
    assert_eq!(json["state"]["mode"], "algorithmic");
    assert_eq!(json["state"]["current_turn"], "X");
    assert_eq!(json["state"]["winner"], Value::Null);
    assert_eq!(json["state"]["is_draw"], false);
    assert_eq!(json["state"]["game_over"], false);
    assert_eq!(
        json["state"]["board"],
        json!([["", "", ""], ["", "", ""], ["", "", ""]])
    );
    assert_eq!(json["message"], "New game created with algorithmic mode");
}

#[tokio::test]
async fn test_new_game_oracle_mode() {
    let app = test_app();
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/game/new",
        Some(json!({ "mode": "oracle" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"]["mode"], "oracle");
}

#[tokio::test]
async fn test_new_game_accepts_grok_ai_mode_name() {
    let app = test_app();
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/game/new",
        Some(json!({ "mode": "grok_ai" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"]["mode"], "oracle");
}

#[tokio::test]
async fn test_every_mode_round_trips() {
    let app = test_app();
    for mode in GameMode::iter() {
        let (status, json) = send(
            &app,
            Method::POST,
            "/api/game/new",
            Some(json!({ "mode": mode })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["state"]["mode"], mode.to_string());
        assert_eq!(
            json["message"],
            format!("New game created with {} mode", mode)
        );
    }
}

#[tokio::test]
async fn test_new_game_rejects_unknown_mode() {
    let app = test_app();
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/game/new",
        Some(json!({ "mode": "telepathy" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("telepathy"));
}

#[tokio::test]
async fn test_malformed_body_is_422_with_detail() {
    let app = test_app();
    let id = new_game(&app, json!({})).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/game/{}/move", id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"row\": 1,"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_get_state() {
    let app = test_app();
    let id = new_game(&app, json!({})).await;

    let (status, json) = send(&app, Method::GET, &format!("/api/game/{}/state", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], id.as_str());
    assert_eq!(json["state"]["current_turn"], "X");
    assert!(json.get("message").is_none());
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = test_app();

    let (status, json) = send(&app, Method::GET, "/api/game/nope/state", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], "Session not found");

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/game/nope/move",
        Some(json!({ "row": 0, "col": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], "Session not found");

    let (status, _) = send(&app, Method::DELETE, "/api/game/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_move_gets_a_reply() {
    let app = test_app();
    let id = new_game(&app, json!({})).await;

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/game/{}/move", id),
        Some(json!({ "row": 0, "col": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let board = &json["state"]["board"];
    assert_eq!(board[0][0], "X");
    assert_eq!(board[1][1], "O");
    assert_eq!(marks(board, "X"), 1);
    assert_eq!(marks(board, "O"), 1);
    assert_eq!(json["state"]["current_turn"], "X");
    assert_eq!(json["state"]["game_over"], false);

    // The reply is stored, not just returned.
    let (_, state) = send(&app, Method::GET, &format!("/api/game/{}/state", id), None).await;
    assert_eq!(state["state"]["board"], *board);
}

#[tokio::test]
async fn test_occupied_square_is_400() {
    let app = test_app();
    let id = new_game(&app, json!({})).await;
    let uri = format!("/api/game/{}/move", id);

    send(&app, Method::POST, &uri, Some(json!({ "row": 1, "col": 1 }))).await;
    let (status, json) = send(&app, Method::POST, &uri, Some(json!({ "row": 1, "col": 1 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("occupied"));
}

#[tokio::test]
async fn test_out_of_range_move_is_422() {
    let app = test_app();
    let id = new_game(&app, json!({})).await;
    let uri = format!("/api/game/{}/move", id);

    for body in [
        json!({ "row": 3, "col": 0 }),
        json!({ "row": 0, "col": -1 }),
        json!({ "row": "a", "col": 0 }),
        json!({ "row": 0 }),
    ] {
        let (status, json) = send(&app, Method::POST, &uri, Some(body.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {}", body);
        assert!(json["detail"].is_string(), "body {} gave {}", body, json);
    }

    // Nothing was applied.
    let (_, state) = send(&app, Method::GET, &format!("/api/game/{}/state", id), None).await;
    assert_eq!(marks(&state["state"]["board"], "X"), 0);
}

#[tokio::test]
async fn test_full_game_over_http() {
    let app = test_app();
    let id = new_game(&app, json!({})).await;
    let uri = format!("/api/game/{}/move", id);

    let mut last = Value::Null;
    for _ in 0..5 {
        let (_, state) = send(&app, Method::GET, &format!("/api/game/{}/state", id), None).await;
        if state["state"]["game_over"] == true {
            break;
        }
        let board = &state["state"]["board"];
        let (row, col) = (0..3usize)
            .flat_map(|r| (0..3usize).map(move |c| (r, c)))
            .find(|&(r, c)| board[r][c] == "")
            .unwrap();

        let (status, json) = send(&app, Method::POST, &uri, Some(json!({ "row": row, "col": col }))).await;
        assert_eq!(status, StatusCode::OK);
        last = json;
    }

    assert_eq!(last["state"]["game_over"], true);
    assert_ne!(last["state"]["winner"], "X");
    let message = last["message"].as_str().unwrap();
    assert!(message == "Player O wins!" || message == "Game ended in a draw!");

    let (status, json) = send(&app, Method::POST, &uri, Some(json!({ "row": 0, "col": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_delete_game() {
    let app = test_app();
    let id = new_game(&app, json!({})).await;

    let (status, json) = send(&app, Method::DELETE, &format!("/api/game/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Game session deleted successfully");

    let (status, _) = send(&app, Method::GET, &format!("/api/game/{}/state", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/game/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/game/new")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
