//! Per-turn countdown.
//!
//! Purely cosmetic: it broadcasts ticks and an expiry notice but never touches
//! the engine. Expiry does not advance the turn.

use crate::protocol::ServerMessage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
pub struct TurnTimer {
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TurnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any running countdown and start a new one from `seconds`
    pub async fn start(&self, seconds: u32, tx: broadcast::Sender<ServerMessage>) {
        let mut handle = self.handle.lock().await;
        if let Some(previous) = handle.take() {
            previous.abort();
        }

        *handle = Some(tokio::spawn(async move {
            let mut remaining = seconds;
            // Ignore send errors (no receivers connected is fine)
            let _ = tx.send(ServerMessage::TimerTick {
                remaining_seconds: remaining,
            });

            while remaining > 0 {
                tokio::time::sleep(Duration::from_secs(1)).await;
                remaining -= 1;
                let _ = tx.send(ServerMessage::TimerTick {
                    remaining_seconds: remaining,
                });
            }

            tracing::debug!("Turn timer expired after {}s", seconds);
            let _ = tx.send(ServerMessage::TimerExpired);
        }));
    }

    pub async fn stop(&self) {
        if let Some(handle) = self.handle.lock().await.take() {
            handle.abort();
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
