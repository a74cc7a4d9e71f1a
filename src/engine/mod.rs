//! Turn/round state machine.
//!
//! The engine is a plain value with synchronous commands. It performs no I/O:
//! commands that need something done outside the engine (fetching a challenge,
//! restarting the countdown) return [`Effect`]s for the caller to execute.

mod roster;
mod settings;
mod turn;

use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A challenge fetch the engine wants performed for the active player
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeRequest {
    /// Only the response for the latest generation is applied
    pub generation: Generation,
    pub round: u32,
    pub player_id: PlayerId,
    pub difficulty: Difficulty,
    pub player_names: Vec<String>,
    pub active_player_name: String,
    pub penalty: bool,
}

/// Side effects requested by an engine command
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The active (round, player) slot changed: fetch a challenge, restart the countdown
    TurnChanged(ChallengeRequest),
    /// The active player used their skip: fetch a penalty-marked replacement
    PenaltyRefetch(ChallengeRequest),
    /// Last turn of the last round was played
    GameFinished,
    /// No turn is live any more: play left the Playing phase, or the last
    /// player was removed mid-game
    PlayStopped,
}

/// Serializable view of the engine for clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSnapshot {
    pub phase: GamePhase,
    pub mode: ValidationMode,
    pub round: u32,
    pub round_count: i32,
    pub active_player_index: usize,
    pub active_player_id: Option<PlayerId>,
    pub players: Vec<Player>,
    pub settings: Settings,
    /// In roster order
    pub skipped_this_round: Vec<PlayerId>,
    pub generation: Generation,
}

#[derive(Debug, Clone)]
pub struct TurnEngine {
    mode: ValidationMode,
    roster: Vec<Player>,
    settings: Settings,
    phase: GamePhase,
    active_round: u32,
    active_player_index: usize,
    skipped_this_round: HashSet<PlayerId>,
    generation: Generation,
}

impl TurnEngine {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            mode,
            roster: Vec::new(),
            settings: Settings::default(),
            phase: GamePhase::Home,
            active_round: 1,
            active_player_index: 0,
            skipped_this_round: HashSet::new(),
            generation: 0,
        }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn active_round(&self) -> u32 {
        self.active_round
    }

    pub fn active_player_index(&self) -> usize {
        self.active_player_index
    }

    /// The player whose turn it is; `None` only when the roster is empty
    pub fn active_player(&self) -> Option<&Player> {
        self.roster.get(self.active_player_index)
    }

    pub fn skipped_this_round(&self) -> &HashSet<PlayerId> {
        &self.skipped_this_round
    }

    pub fn has_skipped(&self, player_id: &str) -> bool {
        self.skipped_this_round.contains(player_id)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether a challenge response tagged with `generation` may still be shown
    pub fn is_current(&self, generation: Generation) -> bool {
        self.phase == GamePhase::Playing && self.generation == generation
    }

    /// Playing with someone whose turn it is
    pub fn has_live_turn(&self) -> bool {
        self.phase == GamePhase::Playing && self.active_player().is_some()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            phase: self.phase,
            mode: self.mode,
            round: self.active_round,
            round_count: self.settings.round_count,
            active_player_index: self.active_player_index,
            active_player_id: self.active_player().map(|p| p.id.clone()),
            players: self.roster.clone(),
            settings: self.settings.clone(),
            skipped_this_round: self
                .roster
                .iter()
                .filter(|p| self.skipped_this_round.contains(&p.id))
                .map(|p| p.id.clone())
                .collect(),
            generation: self.generation,
        }
    }

    /// Build a challenge request for the active player, claiming a new generation
    fn challenge_request(&mut self, penalty: bool) -> Option<ChallengeRequest> {
        let active = self.roster.get(self.active_player_index)?;
        let player_id = active.id.clone();
        let active_player_name = active.name.clone();
        self.generation += 1;

        Some(ChallengeRequest {
            generation: self.generation,
            round: self.active_round,
            player_id,
            difficulty: self.settings.difficulty,
            player_names: self.roster.iter().map(|p| p.name.clone()).collect(),
            active_player_name,
            penalty,
        })
    }

    fn turn_changed(&mut self) -> Vec<Effect> {
        self.challenge_request(false)
            .map(Effect::TurnChanged)
            .into_iter()
            .collect()
    }

    /// Drop any challenge still in flight
    fn invalidate_challenges(&mut self) {
        self.generation += 1;
    }
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new(ValidationMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_engine_is_home() {
        let engine = TurnEngine::default();
        assert_eq!(engine.phase(), GamePhase::Home);
        assert_eq!(engine.mode(), ValidationMode::Permissive);
        assert!(engine.roster().is_empty());
        assert!(engine.active_player().is_none());
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn test_snapshot_lists_skips_in_roster_order() {
        let mut engine = TurnEngine::default();
        for name in ["Alice", "Bob", "Cara"] {
            engine.add_player(name).unwrap();
        }
        engine.start_game().unwrap();
        engine.advance_turn();
        engine.skip_turn();
        engine.advance_turn();
        engine.skip_turn();

        let snapshot = engine.snapshot();
        let bob = engine.roster()[1].id.clone();
        let cara = engine.roster()[2].id.clone();
        assert_eq!(snapshot.skipped_this_round, vec![bob, cara.clone()]);
        assert_eq!(snapshot.active_player_id, Some(cara));
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.round_count, 3);
    }

    #[test]
    fn test_is_current_only_while_playing() {
        let mut engine = TurnEngine::default();
        engine.add_player("Alice").unwrap();
        engine.add_player("Bob").unwrap();
        let effects = engine.start_game().unwrap();
        let generation = match &effects[..] {
            [Effect::TurnChanged(request)] => request.generation,
            other => panic!("Expected TurnChanged, got {:?}", other),
        };
        assert!(engine.is_current(generation));

        engine.return_home();
        assert!(!engine.is_current(generation));
        assert!(!engine.is_current(engine.generation()));
    }
}
