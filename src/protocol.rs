use crate::engine::EngineSnapshot;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    AddPlayer {
        name: String,
    },
    RemovePlayer {
        player_id: PlayerId,
    },
    UpdateSettings {
        settings: SettingsPatch,
    },
    StartGame,
    /// "Done" for the active player
    AdvanceTurn,
    SkipTurn,
    ReturnHome,
    ResetGame,
    /// Ask for a fresh `game_state` (e.g. after a reconnect)
    RequestState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        game: EngineSnapshot,
        challenge: Option<ActiveChallenge>,
        server_now: String,
    },
    GameState {
        game: EngineSnapshot,
    },
    PlayerAdded {
        player: Player,
    },
    /// A challenge request is in flight for the active player
    ChallengeLoading {
        generation: Generation,
        player_id: PlayerId,
        penalty: bool,
    },
    Challenge {
        challenge: ActiveChallenge,
    },
    TimerTick {
        remaining_seconds: u32,
    },
    TimerExpired,
    Results {
        standings: Vec<Standing>,
    },
    Error {
        code: String,
        msg: String,
    },
}
