//! WebSocket message dispatch
//!
//! Successful commands answer through the broadcast channel, so the direct
//! reply is only used for errors and explicit state requests.

use crate::error::GameError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use std::sync::Arc;

fn error_message(e: GameError) -> ServerMessage {
    tracing::warn!("Command rejected: {}", e);
    ServerMessage::Error {
        code: e.code().to_string(),
        msg: e.to_string(),
    }
}

/// Handle client messages and return optional response
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    match msg {
        ClientMessage::AddPlayer { name } => state.add_player(&name).await.err().map(error_message),

        ClientMessage::RemovePlayer { player_id } => {
            state.remove_player(&player_id).await.err().map(error_message)
        }

        ClientMessage::UpdateSettings { settings } => {
            state.update_settings(settings).await.err().map(error_message)
        }

        ClientMessage::StartGame => state.start_game().await.err().map(error_message),

        ClientMessage::AdvanceTurn => {
            state.advance_turn().await;
            None
        }

        ClientMessage::SkipTurn => {
            state.skip_turn().await;
            None
        }

        ClientMessage::ReturnHome => {
            state.return_home().await;
            None
        }

        ClientMessage::ResetGame => {
            state.reset_game().await;
            None
        }

        ClientMessage::RequestState => Some(ServerMessage::GameState {
            game: state.snapshot().await,
        }),
    }
}
