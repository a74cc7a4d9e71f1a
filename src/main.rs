use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use partymind::{
    api,
    challenge::{ChallengeConfig, ChallengeProvider},
    config::ServerConfig,
    state::AppState,
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "partymind=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PartyMind...");

    let server_config = ServerConfig::from_env();
    let challenge_config = ChallengeConfig::from_env();

    let manager = if challenge_config.offline {
        tracing::info!("Offline mode: serving dev challenges");
        None
    } else {
        match challenge_config.build_manager() {
            Ok(manager) => {
                tracing::info!("Challenge providers initialized successfully");
                Some(manager)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize challenge providers: {}. Backup tasks will be used.",
                    e
                );
                None
            }
        }
    };

    let provider = ChallengeProvider::new(manager, &challenge_config);
    let state = Arc::new(AppState::with_provider(
        server_config.validation_mode,
        provider,
    ));
    tracing::info!("Validation mode: {:?}", server_config.validation_mode);

    let app = api::router(state);

    let addr = server_config.bind_addr;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
