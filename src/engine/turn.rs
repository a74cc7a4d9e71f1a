use super::{Effect, TurnEngine};
use crate::error::{GameError, GameResult};
use crate::types::*;

impl TurnEngine {
    /// Enter Playing at round 1 with the first player active.
    ///
    /// Scores carry over; a fresh game starts from `reset_game`.
    pub fn start_game(&mut self) -> GameResult<Vec<Effect>> {
        if self.mode == ValidationMode::Strict {
            if self.phase == GamePhase::Playing {
                return Err(GameError::InvalidPhase {
                    action: "start a game",
                    phase: self.phase,
                });
            }
            if self.roster.len() < 2 {
                return Err(GameError::Validation(format!(
                    "At least 2 players are required, got {}",
                    self.roster.len()
                )));
            }
            if self.settings.round_count < 1 {
                return Err(GameError::Validation(
                    "Round count must be at least 1".to_string(),
                ));
            }
        }

        self.phase = GamePhase::Playing;
        self.active_round = 1;
        self.active_player_index = 0;
        self.skipped_this_round.clear();

        Ok(self.turn_changed())
    }

    /// "Done": score the active player and pass the turn on
    pub fn advance_turn(&mut self) -> Vec<Effect> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }

        if let Some(player) = self.roster.get_mut(self.active_player_index) {
            player.score += 1;
        }

        let next_index = self.active_player_index + 1;
        if next_index < self.roster.len() {
            self.active_player_index = next_index;
            return self.turn_changed();
        }

        let next_round = self.active_round + 1;
        if i64::from(next_round) > i64::from(self.settings.round_count) {
            self.phase = GamePhase::Results;
            self.invalidate_challenges();
            tracing::info!("Game finished after {} rounds", self.active_round);
            return vec![Effect::GameFinished];
        }

        self.active_round = next_round;
        self.active_player_index = 0;
        self.skipped_this_round.clear();
        self.turn_changed()
    }

    /// Use the active player's one skip for this round.
    ///
    /// A second skip by the same player in the same round does nothing.
    pub fn skip_turn(&mut self) -> Vec<Effect> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }
        let Some(player_id) = self.active_player().map(|p| p.id.clone()) else {
            return Vec::new();
        };
        if !self.skipped_this_round.insert(player_id) {
            return Vec::new();
        }

        self.challenge_request(true)
            .map(Effect::PenaltyRefetch)
            .into_iter()
            .collect()
    }

    /// Back to Home, keeping players and settings
    pub fn return_home(&mut self) -> Vec<Effect> {
        self.phase = GamePhase::Home;
        self.invalidate_challenges();
        vec![Effect::PlayStopped]
    }

    /// Back to Home with an empty roster; settings are kept
    pub fn reset_game(&mut self) -> Vec<Effect> {
        self.phase = GamePhase::Home;
        self.roster.clear();
        self.skipped_this_round.clear();
        self.active_round = 1;
        self.active_player_index = 0;
        self.invalidate_challenges();
        vec![Effect::PlayStopped]
    }
}
