use super::TurnEngine;
use crate::error::{GameError, GameResult};
use crate::types::*;

impl TurnEngine {
    /// Shallow-merge `patch` into the current settings.
    ///
    /// Permissive mode stores values as given; strict mode checks ranges and
    /// refuses changes during play.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> GameResult<&Settings> {
        if self.mode == ValidationMode::Strict {
            if self.phase == GamePhase::Playing {
                return Err(GameError::InvalidPhase {
                    action: "change settings",
                    phase: self.phase,
                });
            }
            if let Some(rounds) = patch.round_count {
                if rounds < 1 {
                    return Err(GameError::Validation(format!(
                        "Round count must be at least 1, got {}",
                        rounds
                    )));
                }
            }
            if let Some(seconds) = patch.time_budget_seconds {
                if seconds < 0 {
                    return Err(GameError::Validation(format!(
                        "Time budget cannot be negative, got {}",
                        seconds
                    )));
                }
            }
        }

        let settings = &mut self.settings;
        if let Some(rounds) = patch.round_count {
            settings.round_count = rounds;
        }
        if let Some(seconds) = patch.time_budget_seconds {
            settings.time_budget_seconds = seconds;
        }
        if let Some(difficulty) = patch.difficulty {
            settings.difficulty = difficulty;
        }
        if let Some(sound_enabled) = patch.sound_enabled {
            settings.sound_enabled = sound_enabled;
        }

        Ok(&self.settings)
    }
}
