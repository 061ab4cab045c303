use anyhow::Result;
use tokio::signal;

/// Resolves on Ctrl+C or SIGTERM.
pub async fn wait_for_shutdown() -> Result<()> {
    tokio::select! {
        result = wait_ctrl_c() => result?,
        result = wait_sigterm() => result?,
    };

    tracing::info!("shutdown signal received, draining connections");
    Ok(())
}

async fn wait_ctrl_c() -> Result<()> {
    signal::ctrl_c().await.map_err(|e| {
        tracing::error!(%e, "error handling Ctrl+C signal");
        e
    })?;
    tracing::info!("received Ctrl+C");
    Ok(())
}

#[cfg(unix)]
async fn wait_sigterm() -> Result<()> {
    let mut signal_handler =
        signal::unix::signal(signal::unix::SignalKind::terminate()).map_err(|e| {
            tracing::error!(%e, "failed to install SIGTERM handler");
            e
        })?;
    signal_handler.recv().await;
    tracing::info!("received SIGTERM");
    Ok(())
}

#[cfg(not(unix))]
async fn wait_sigterm() -> Result<()> {
    std::future::pending::<Result<()>>().await
}
