//! HTTP API endpoints.
//!
//! `/api/generate` is the challenge relay: it forwards a prompt to the
//! configured model and reports failures as 500s. The game itself never
//! calls it; it uses the provider in-process and falls back on errors.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::challenge::ProviderError;
use crate::engine::EngineSnapshot;
use crate::state::AppState;
use crate::types::{ActiveChallenge, Standing};
use crate::ws;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/generate", post(generate_challenge))
        .route("/api/state", get(get_state))
        .route("/api/results", get(get_results))
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Roster entries may be plain names or player objects with a `name` field
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlayerName {
    Name(String),
    Player { name: String },
}

impl PlayerName {
    pub fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Player { name } => name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateChallengeBody {
    pub difficulty: String,
    #[serde(default)]
    pub players: Vec<PlayerName>,
    pub current_player_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Generate a challenge through the configured providers.
///
/// POST /api/generate
pub async fn generate_challenge(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateChallengeBody>,
) -> Response {
    let players: Vec<String> = body.players.into_iter().map(PlayerName::into_name).collect();

    match state
        .provider
        .generate(&body.difficulty, &players, &body.current_player_name)
        .await
    {
        Ok(challenge) => (StatusCode::OK, Json(ChallengeResponse { challenge })).into_response(),
        Err(e) => {
            tracing::error!("Challenge relay failed: {}", e);
            let error = match e {
                ProviderError::NotConfigured => "Server missing API Key",
                _ => "Failed to generate challenge",
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: error.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub game: EngineSnapshot,
    pub challenge: Option<ActiveChallenge>,
}

/// Current engine state and challenge.
///
/// GET /api/state
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        game: state.snapshot().await,
        challenge: state.current_challenge().await,
    })
}

/// Leaderboard, highest score first.
///
/// GET /api/results
pub async fn get_results(State(state): State<Arc<AppState>>) -> Json<Vec<Standing>> {
    Json(state.standings().await)
}
