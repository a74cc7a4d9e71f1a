mod challenge;
mod commands;

use crate::challenge::ChallengeProvider;
use crate::engine::{EngineSnapshot, TurnEngine};
use crate::protocol::ServerMessage;
use crate::timer::TurnTimer;
use crate::types::*;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Single owner of all game state; every command runs under its write lock
    pub engine: Arc<RwLock<TurnEngine>>,
    /// Challenge currently shown for the active player
    pub challenge: Arc<RwLock<Option<ActiveChallenge>>>,
    pub provider: Arc<ChallengeProvider>,
    /// Broadcast channel for sending messages to all clients
    pub broadcast: broadcast::Sender<ServerMessage>,
    pub timer: TurnTimer,
}

impl AppState {
    /// Offline state for local play and tests
    pub fn new() -> Self {
        Self::with_provider(ValidationMode::default(), ChallengeProvider::offline())
    }

    pub fn with_provider(mode: ValidationMode, provider: ChallengeProvider) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            engine: Arc::new(RwLock::new(TurnEngine::new(mode))),
            challenge: Arc::new(RwLock::new(None)),
            provider: Arc::new(provider),
            broadcast: tx,
            timer: TurnTimer::new(),
        }
    }

    pub async fn snapshot(&self) -> EngineSnapshot {
        self.engine.read().await.snapshot()
    }

    pub async fn current_challenge(&self) -> Option<ActiveChallenge> {
        self.challenge.read().await.clone()
    }

    pub async fn standings(&self) -> Vec<Standing> {
        self.engine.read().await.standings()
    }

    /// Send to every connected client. No receivers is fine.
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        let _ = self.broadcast.send(msg);
    }

    fn broadcast_state(&self, game: EngineSnapshot) {
        self.broadcast_to_all(ServerMessage::GameState { game });
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_state_is_home() {
        let state = AppState::new();
        let snapshot = state.snapshot().await;

        assert_eq!(snapshot.phase, GamePhase::Home);
        assert!(snapshot.players.is_empty());
        assert!(state.current_challenge().await.is_none());
        assert!(state.provider.is_offline());
    }

    #[tokio::test]
    async fn test_broadcast_without_receivers_is_ignored() {
        let state = AppState::new();
        state.broadcast_to_all(ServerMessage::TimerExpired);

        let mut rx = state.broadcast.subscribe();
        state.broadcast_to_all(ServerMessage::TimerExpired);
        assert!(matches!(rx.recv().await, Ok(ServerMessage::TimerExpired)));
    }
}
