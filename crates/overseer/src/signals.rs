//! Signal handling for graceful shutdown.
//!
//! The first SIGINT/SIGTERM flips the shared [`ShutdownState`] so the tick
//! loop stops raising events; a second one exits immediately.

use overseer_event_system::ShutdownState;
use tokio::signal;
use tracing::{error, info, warn};

/// Resolves when the process receives a termination signal.
pub async fn wait_for_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => (),
            _ = sigterm.recv() => ()
        }
    }

    #[cfg(windows)]
    signal::ctrl_c().await?;

    Ok(())
}

/// Spawns the signal watcher. Returns the task handle so the caller can
/// abort it once the session ends on its own.
pub fn spawn_signal_watcher(shutdown_state: ShutdownState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = wait_for_signal().await {
            error!("Failed to set up shutdown signal handler: {e}");
            return;
        }
        info!("📡 Received shutdown signal - initiating graceful shutdown");
        shutdown_state.initiate_shutdown();

        if wait_for_signal().await.is_ok() {
            warn!("Shutdown signal received again! Exiting immediately.");
            std::process::exit(1);
        }
    })
}
