//! Headless overlay server.
//!
//! Starts the axum web server, the game clock, the optional chat auto-join,
//! and waits for Ctrl+C.

use stream_nexus_lib::shutdown::graceful_shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stream_nexus_lib::init_tracing();
    tracing::info!("Starting chat overlay server");

    let state = stream_nexus_lib::init_foundation()?;
    let server_handle = stream_nexus_lib::spawn_background_tasks(&state).await;

    tracing::info!(
        port = state.server_port().await,
        "Server running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    graceful_shutdown(&state).await;
    if let Err(e) = server_handle.await {
        tracing::error!("Server task ended abnormally: {e}");
    }
    Ok(())
}
