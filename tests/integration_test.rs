use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use partymind::api;
use partymind::challenge::ChallengeProvider;
use partymind::protocol::{ClientMessage, ServerMessage};
use partymind::state::AppState;
use partymind::types::{ChallengeSource, GamePhase, SettingsPatch, ValidationMode};
use partymind::ws::handlers::handle_message;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

async fn add(state: &Arc<AppState>, name: &str) {
    let result = handle_message(
        ClientMessage::AddPlayer {
            name: name.to_string(),
        },
        state,
    )
    .await;
    assert!(result.is_none(), "Adding {} should succeed", name);
}

fn fast_state(mode: ValidationMode) -> Arc<AppState> {
    Arc::new(AppState::with_provider(
        mode,
        ChallengeProvider::offline().with_dev_delay(Duration::from_millis(1)),
    ))
}

/// End-to-end game: three players, three rounds, nobody skips
#[tokio::test]
async fn test_full_game_flow() {
    let state = fast_state(ValidationMode::Permissive);

    add(&state, "Alice").await;
    add(&state, "Bob").await;
    add(&state, "Cara").await;

    assert!(handle_message(ClientMessage::StartGame, &state)
        .await
        .is_none());

    let game = state.snapshot().await;
    assert_eq!(game.phase, GamePhase::Playing);
    assert_eq!(game.round, 1);
    assert_eq!(game.active_player_id.as_deref(), Some(game.players[0].id.as_str()));

    for turn in 0..9 {
        let game = state.snapshot().await;
        assert_eq!(game.phase, GamePhase::Playing, "turn {}", turn);
        assert_eq!(game.active_player_index, turn % 3);
        assert_eq!(game.round, (turn / 3 + 1) as u32);

        handle_message(ClientMessage::AdvanceTurn, &state).await;
    }

    let game = state.snapshot().await;
    assert_eq!(game.phase, GamePhase::Results);
    assert!(game.players.iter().all(|p| p.score == 3));
    assert!(state.current_challenge().await.is_none());

    let standings = state.standings().await;
    assert_eq!(standings.len(), 3);
    assert!(standings.iter().all(|s| s.rank == 1 && s.score == 3));

    // Advancing after the game ended changes nothing
    handle_message(ClientMessage::AdvanceTurn, &state).await;
    assert_eq!(state.snapshot().await.players[0].score, 3);
}

#[tokio::test]
async fn test_skip_gives_penalty_then_advances() {
    let state = fast_state(ValidationMode::Permissive);
    add(&state, "Alice").await;
    add(&state, "Bob").await;
    handle_message(ClientMessage::StartGame, &state).await;

    handle_message(ClientMessage::SkipTurn, &state).await;
    let game = state.snapshot().await;
    assert_eq!(game.active_player_index, 0);
    assert_eq!(game.skipped_this_round, vec![game.players[0].id.clone()]);

    // Second skip in the same round does nothing
    let generation = game.generation;
    handle_message(ClientMessage::SkipTurn, &state).await;
    assert_eq!(state.snapshot().await.generation, generation);

    handle_message(ClientMessage::AdvanceTurn, &state).await;
    let game = state.snapshot().await;
    assert_eq!(game.players[0].score, 1);
    assert_eq!(game.active_player_index, 1);

    // Finishing the round clears the skip record
    handle_message(ClientMessage::AdvanceTurn, &state).await;
    let game = state.snapshot().await;
    assert_eq!(game.round, 2);
    assert!(game.skipped_this_round.is_empty());
}

#[tokio::test]
async fn test_dev_challenge_reaches_clients() {
    let state = fast_state(ValidationMode::Permissive);
    add(&state, "Alice").await;
    add(&state, "Bob").await;
    let mut rx = state.broadcast.subscribe();

    handle_message(ClientMessage::StartGame, &state).await;

    let challenge = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(ServerMessage::Challenge { challenge }) = rx.recv().await {
                return challenge;
            }
        }
    })
    .await
    .expect("challenge should arrive");

    assert_eq!(challenge.source, ChallengeSource::Dev);
    assert_eq!(challenge.player_name, "Alice");
    assert!(challenge.text.starts_with("[DEV]"));
    assert_eq!(state.current_challenge().await, Some(challenge));
}

#[tokio::test]
async fn test_remove_active_player_mid_game() {
    let state = fast_state(ValidationMode::Permissive);
    add(&state, "Alice").await;
    add(&state, "Bob").await;
    add(&state, "Cara").await;
    handle_message(ClientMessage::StartGame, &state).await;
    handle_message(ClientMessage::AdvanceTurn, &state).await;
    handle_message(ClientMessage::AdvanceTurn, &state).await;

    // Cara (last) is active; removing her clamps to Bob
    let cara = state.snapshot().await.players[2].id.clone();
    let result = handle_message(ClientMessage::RemovePlayer { player_id: cara }, &state).await;
    assert!(result.is_none());

    let game = state.snapshot().await;
    assert_eq!(game.players.len(), 2);
    assert_eq!(game.active_player_index, 1);
    assert_eq!(game.phase, GamePhase::Playing);
}

#[tokio::test]
async fn test_strict_mode_rejects_roster_changes_during_play() {
    let state = fast_state(ValidationMode::Strict);
    add(&state, "Alice").await;
    add(&state, "Bob").await;
    handle_message(ClientMessage::StartGame, &state).await;

    match handle_message(
        ClientMessage::AddPlayer {
            name: "Dan".to_string(),
        },
        &state,
    )
    .await
    {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "INVALID_PHASE"),
        other => panic!("Expected Error, got {:?}", other),
    }

    match handle_message(
        ClientMessage::UpdateSettings {
            settings: SettingsPatch {
                round_count: Some(5),
                ..Default::default()
            },
        },
        &state,
    )
    .await
    {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "INVALID_PHASE"),
        other => panic!("Expected Error, got {:?}", other),
    }

    assert_eq!(state.snapshot().await.players.len(), 2);
}

#[tokio::test]
async fn test_return_home_keeps_roster_and_scores() {
    let state = fast_state(ValidationMode::Permissive);
    add(&state, "Alice").await;
    add(&state, "Bob").await;
    handle_message(ClientMessage::StartGame, &state).await;
    handle_message(ClientMessage::AdvanceTurn, &state).await;

    handle_message(ClientMessage::ReturnHome, &state).await;
    let game = state.snapshot().await;
    assert_eq!(game.phase, GamePhase::Home);
    assert_eq!(game.players[0].score, 1);

    // Scores carry over into the next game
    handle_message(ClientMessage::StartGame, &state).await;
    let game = state.snapshot().await;
    assert_eq!(game.round, 1);
    assert_eq!(game.players[0].score, 1);

    handle_message(ClientMessage::ResetGame, &state).await;
    let game = state.snapshot().await;
    assert_eq!(game.phase, GamePhase::Home);
    assert!(game.players.is_empty());
}

#[tokio::test]
async fn test_generate_without_api_key_returns_500() {
    let app = api::router(fast_state(ValidationMode::Permissive));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"difficulty":"Fun","players":["Alice","Bob"],"currentPlayerName":"Alice"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Server missing API Key");
}

#[tokio::test]
async fn test_state_and_results_endpoints() {
    let state = fast_state(ValidationMode::Permissive);
    add(&state, "Alice").await;
    add(&state, "Bob").await;
    let app = api::router(state.clone());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/state").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["game"]["phase"], "HOME");
    assert_eq!(json["game"]["players"].as_array().unwrap().len(), 2);
    assert!(json["challenge"].is_null());

    state.start_game().await.unwrap();
    state.advance_turn().await;

    let response = app
        .oneshot(Request::builder().uri("/api/results").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json[0]["name"], "Alice");
    assert_eq!(json[0]["score"], 1);
    assert_eq!(json[0]["rank"], 1);
    assert_eq!(json[1]["rank"], 2);
}
