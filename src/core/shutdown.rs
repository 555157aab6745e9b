//! # OS termination signals.
//!
//! [`os_signal`] completes when the process is asked to stop:
//! - **Unix**: `SIGINT`, `SIGTERM`, `SIGQUIT`
//! - **elsewhere**: Ctrl-C via [`tokio::signal::ctrl_c`]
//!
//! If the handlers cannot be installed the future never completes, so a bank
//! without signal support simply runs to its natural end.

use std::future::pending;

/// Resolves on the first termination signal.
pub async fn os_signal() {
    if listen().await.is_err() {
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn listen() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = interrupt.recv() => {},
        _ = terminate.recv() => {},
        _ = quit.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
async fn listen() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
