use super::AppState;
use crate::engine::{Effect, EngineSnapshot, TurnEngine};
use crate::error::GameResult;
use crate::protocol::ServerMessage;
use crate::types::*;

// Every command keeps the engine write lock until its effects have run, so
// effects from concurrent commands apply in the order the engine produced them.
impl AppState {
    pub async fn add_player(&self, name: &str) -> GameResult<Player> {
        let mut engine = self.engine.write().await;
        let player = engine.add_player(name)?;

        tracing::info!("Added player {} ({})", player.name, player.id);
        self.broadcast_to_all(ServerMessage::PlayerAdded {
            player: player.clone(),
        });
        self.broadcast_state(engine.snapshot());
        Ok(player)
    }

    pub async fn remove_player(&self, player_id: &str) -> GameResult<EngineSnapshot> {
        let mut engine = self.engine.write().await;
        let effects = engine.remove_player(player_id)?;

        tracing::info!("Removed player {}", player_id);
        Ok(self.finish(&engine, effects).await)
    }

    pub async fn update_settings(&self, patch: SettingsPatch) -> GameResult<Settings> {
        let mut engine = self.engine.write().await;
        let settings = engine.update_settings(patch)?.clone();

        tracing::info!("Settings updated: {:?}", settings);
        self.broadcast_state(engine.snapshot());
        Ok(settings)
    }

    pub async fn start_game(&self) -> GameResult<EngineSnapshot> {
        let mut engine = self.engine.write().await;
        let effects = engine.start_game()?;

        tracing::info!(
            "Game started with {} players, {} rounds",
            engine.roster().len(),
            engine.settings().round_count
        );
        Ok(self.finish(&engine, effects).await)
    }

    pub async fn advance_turn(&self) -> EngineSnapshot {
        let mut engine = self.engine.write().await;
        let effects = engine.advance_turn();
        self.finish(&engine, effects).await
    }

    pub async fn skip_turn(&self) -> EngineSnapshot {
        let mut engine = self.engine.write().await;
        let effects = engine.skip_turn();
        self.finish(&engine, effects).await
    }

    pub async fn return_home(&self) -> EngineSnapshot {
        let mut engine = self.engine.write().await;
        let effects = engine.return_home();
        self.finish(&engine, effects).await
    }

    pub async fn reset_game(&self) -> EngineSnapshot {
        let mut engine = self.engine.write().await;
        let effects = engine.reset_game();
        tracing::info!("Game reset, roster cleared");
        self.finish(&engine, effects).await
    }

    /// Publish the new state, then run the engine's effects
    async fn finish(&self, engine: &TurnEngine, effects: Vec<Effect>) -> EngineSnapshot {
        let snapshot = engine.snapshot();
        self.broadcast_state(snapshot.clone());
        self.apply_effects(engine, effects).await;
        snapshot
    }

    /// Execute what the engine asked for, in order.
    ///
    /// Effects that no longer match the engine's state are skipped.
    async fn apply_effects(&self, engine: &TurnEngine, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::TurnChanged(request) => {
                    if !engine.is_current(request.generation) {
                        tracing::debug!("Skipping stale turn change {}", request.generation);
                        continue;
                    }
                    self.restart_timer(engine.settings().time_budget_seconds).await;
                    self.dispatch_challenge(engine, request).await;
                }
                Effect::PenaltyRefetch(request) => {
                    self.dispatch_challenge(engine, request).await;
                }
                Effect::GameFinished => {
                    if engine.phase() != GamePhase::Results {
                        continue;
                    }
                    self.timer.stop().await;
                    self.challenge.write().await.take();
                    let standings = engine.standings();
                    if let Some(winner) = standings.first() {
                        tracing::info!("Winner: {} with {} points", winner.name, winner.score);
                    }
                    self.broadcast_to_all(ServerMessage::Results { standings });
                }
                Effect::PlayStopped => {
                    if engine.has_live_turn() {
                        continue;
                    }
                    self.timer.stop().await;
                    self.challenge.write().await.take();
                }
            }
        }
    }

    /// Start a fresh countdown for the new turn, or stop it when timing is off
    async fn restart_timer(&self, budget: i64) {
        if budget > 0 {
            let seconds = u32::try_from(budget).unwrap_or(u32::MAX);
            self.timer.start(seconds, self.broadcast.clone()).await;
        } else {
            self.timer.stop().await;
        }
    }
}
