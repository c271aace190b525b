use crate::app::SharedState;
use crate::config::SettingsManager;
use crate::server;
use crate::services::{chat_pump, game_clock, log_buffer::LogCaptureLayer};

/// Console output filtered by `RUST_LOG`, plus in-memory capture for the log API.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(LogCaptureLayer::new())
        .init();
}

/// Load `.env`, read settings and build the shared state (fatal on error).
pub fn init_foundation() -> Result<SharedState, anyhow::Error> {
    load_dotenv();

    let sm = SettingsManager::from_env();
    let status = sm.check_feature_status();
    if !status.missing_settings.is_empty() || !status.warnings.is_empty() {
        tracing::warn!(
            "Missing settings: {:?}, warnings: {:?}",
            status.missing_settings,
            status.warnings
        );
    }

    let state = SharedState::new(sm)?;
    tracing::info!("Settings loaded");
    Ok(state)
}

/// Spawn the web server, the game clock and the optional auto-join.
pub async fn spawn_background_tasks(state: &SharedState) -> tokio::task::JoinHandle<()> {
    let s = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(s).await {
            tracing::error!("Server failed: {e}");
        }
    });

    let s = state.clone();
    tokio::spawn(async move { game_clock::run(s).await });

    let default_channel = state.config().await.default_channel.clone();
    if let Some(channel) = default_channel {
        if let Err(e) = chat_pump::connect(state, &channel).await {
            tracing::error!("Failed to join DEFAULT_CHANNEL {channel}: {e}");
        }
    }

    server_handle
}

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
