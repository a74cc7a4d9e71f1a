use super::AppState;
use crate::challenge::Challenge;
use crate::engine::{ChallengeRequest, TurnEngine};
use crate::protocol::ServerMessage;
use crate::types::*;

impl AppState {
    /// Clear the shown challenge and fetch a new one in the background.
    ///
    /// Requests superseded by a newer generation leave the current challenge alone.
    pub(super) async fn dispatch_challenge(&self, engine: &TurnEngine, request: ChallengeRequest) {
        if !engine.is_current(request.generation) {
            tracing::debug!(
                "Not dispatching stale challenge request (generation {}, current {})",
                request.generation,
                engine.generation()
            );
            return;
        }

        self.challenge.write().await.take();
        self.broadcast_to_all(ServerMessage::ChallengeLoading {
            generation: request.generation,
            player_id: request.player_id.clone(),
            penalty: request.penalty,
        });

        let state = self.clone();
        tokio::spawn(async move {
            state.fetch_and_apply(request).await;
        });
    }

    /// Ask the provider for a challenge and show it if it is still wanted
    pub async fn fetch_and_apply(&self, request: ChallengeRequest) -> bool {
        let challenge = self
            .provider
            .request_challenge(
                request.difficulty.as_str(),
                &request.player_names,
                &request.active_player_name,
            )
            .await;

        self.apply_challenge(&request, challenge).await
    }

    /// Store and broadcast a challenge response.
    ///
    /// Returns false when a newer request was issued since (or play stopped),
    /// in which case the response is dropped.
    pub async fn apply_challenge(&self, request: &ChallengeRequest, challenge: Challenge) -> bool {
        // Hold the engine lock so no command can bump the generation mid-apply
        let engine = self.engine.read().await;
        if !engine.is_current(request.generation) {
            tracing::debug!(
                "Discarding stale challenge (generation {}, current {})",
                request.generation,
                engine.generation()
            );
            return false;
        }

        let active = ActiveChallenge {
            generation: request.generation,
            round: request.round,
            player_id: request.player_id.clone(),
            player_name: request.active_player_name.clone(),
            text: challenge.text,
            penalty: request.penalty,
            source: challenge.source,
        };
        *self.challenge.write().await = Some(active.clone());
        drop(engine);

        self.broadcast_to_all(ServerMessage::Challenge { challenge: active });
        true
    }
}
