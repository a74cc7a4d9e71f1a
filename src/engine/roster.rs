use super::{Effect, TurnEngine};
use crate::error::{GameError, GameResult};
use crate::types::*;

impl TurnEngine {
    /// Append a player to the end of the rotation
    pub fn add_player(&mut self, name: &str) -> GameResult<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::Validation(
                "Player name cannot be empty".to_string(),
            ));
        }
        if self.mode == ValidationMode::Strict && self.phase == GamePhase::Playing {
            return Err(GameError::InvalidPhase {
                action: "add players",
                phase: self.phase,
            });
        }

        let player = Player {
            id: ulid::Ulid::new().to_string(),
            name: name.to_string(),
            score: 0,
        };
        self.roster.push(player.clone());
        Ok(player)
    }

    /// Remove a player by id. Unknown ids are ignored.
    ///
    /// Mid-game removal keeps the rotation consistent: players after the
    /// removed one shift down a slot, and if the active player was removed the
    /// next player in order takes the turn. When the removed player was last
    /// in the rotation the index clamps back, so the new last player plays a
    /// second (scoring) turn this round. Removing the only player stops the
    /// turn; the phase stays Playing with nobody active.
    pub fn remove_player(&mut self, player_id: &str) -> GameResult<Vec<Effect>> {
        let Some(removed_index) = self.roster.iter().position(|p| p.id == player_id) else {
            return Ok(Vec::new());
        };
        if self.mode == ValidationMode::Strict && self.phase == GamePhase::Playing {
            return Err(GameError::InvalidPhase {
                action: "remove players",
                phase: self.phase,
            });
        }

        let previous_active = self.active_player().map(|p| p.id.clone());

        self.roster.remove(removed_index);
        self.skipped_this_round.remove(player_id);

        if removed_index < self.active_player_index {
            self.active_player_index -= 1;
        }
        if self.active_player_index >= self.roster.len() {
            self.active_player_index = self.roster.len().saturating_sub(1);
        }

        if self.phase == GamePhase::Playing
            && self.active_player().map(|p| &p.id) != previous_active.as_ref()
        {
            if self.roster.is_empty() {
                self.invalidate_challenges();
                return Ok(vec![Effect::PlayStopped]);
            }
            return Ok(self.turn_changed());
        }
        Ok(Vec::new())
    }

    /// Leaderboard sorted by score, highest first. The roster itself is never reordered.
    pub fn standings(&self) -> Vec<Standing> {
        let mut sorted: Vec<&Player> = self.roster.iter().collect();
        // Stable sort: ties keep roster order
        sorted.sort_by(|a, b| b.score.cmp(&a.score));

        let mut standings: Vec<Standing> = Vec::with_capacity(sorted.len());
        for (position, player) in sorted.into_iter().enumerate() {
            let rank = match standings.last() {
                Some(prev) if prev.score == player.score => prev.rank,
                _ => position + 1,
            };
            standings.push(Standing {
                rank,
                player_id: player.id.clone(),
                name: player.name.clone(),
                score: player.score,
            });
        }
        standings
    }
}
