use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Opaque ID types for type safety
pub type PlayerId = String;
pub type Generation = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    #[default]
    Home,
    Playing,
    Results,
}

/// Mode tag handed to the challenge provider. The turn engine never looks inside it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Fun,
    Family,
    Standard,
    Intense,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fun => "fun",
            Self::Family => "family",
            Self::Standard => "standard",
            Self::Intense => "intense",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Full rotations through the roster ("circles")
    pub round_count: i32,
    /// 0 disables the countdown
    pub time_budget_seconds: i64,
    pub difficulty: Difficulty,
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_count: 3,
            time_budget_seconds: 0,
            difficulty: Difficulty::Fun,
            sound_enabled: true,
        }
    }
}

/// Partial settings update; `None` fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SettingsPatch {
    #[serde(default)]
    pub round_count: Option<i32>,
    #[serde(default)]
    pub time_budget_seconds: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub sound_enabled: Option<bool>,
}

/// How strictly the engine checks preconditions.
///
/// `Permissive` accepts what the UI hands it: one-player games, zero-round
/// games, negative time budgets and roster edits mid-game. `Strict` rejects
/// all of those with a validation or phase error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Permissive,
    Strict,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(format!("Unknown validation mode '{}'", other)),
        }
    }
}

/// One row of the results leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Standing {
    /// 1-based; tied scores share a rank
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
}

/// Where a challenge text came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeSource {
    Live,
    Backup,
    Dev,
}

/// The challenge currently shown to the active player
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveChallenge {
    pub generation: Generation,
    pub round: u32,
    pub player_id: PlayerId,
    pub player_name: String,
    pub text: String,
    /// Replacement after a skip; the UI marks it as a penalty
    pub penalty: bool,
    pub source: ChallengeSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.round_count, 3);
        assert_eq!(settings.time_budget_seconds, 0);
        assert_eq!(settings.difficulty, Difficulty::Fun);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn test_validation_mode_from_str() {
        assert_eq!("strict".parse(), Ok(ValidationMode::Strict));
        assert_eq!(" Permissive ".parse(), Ok(ValidationMode::Permissive));
        assert!("lenient".parse::<ValidationMode>().is_err());
    }

    #[test]
    fn test_settings_patch_accepts_partial_json() {
        let patch: SettingsPatch = serde_json::from_str(r#"{"round_count": 5}"#).unwrap();
        assert_eq!(patch.round_count, Some(5));
        assert!(patch.difficulty.is_none());

        let patch: SettingsPatch =
            serde_json::from_str(r#"{"difficulty": "intense", "sound_enabled": false}"#).unwrap();
        assert_eq!(patch.difficulty, Some(Difficulty::Intense));
        assert_eq!(patch.sound_enabled, Some(false));
    }
}
