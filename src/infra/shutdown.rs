//! Graceful shutdown: stop accepting, let in-flight scans finish, then cancel the rest.

use std::future::Future;
use std::time::Duration;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Resolves on SIGINT or SIGTERM.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// Graceful-shutdown future for `axum::serve`.
///
/// Returns as soon as `signal` fires, so the server stops accepting right away and
/// starts draining. Requests still running after `grace` see `shutdown` cancelled and
/// stop at their next pipeline stage boundary.
pub async fn shutdown_on<F>(signal: F, shutdown: CancellationToken, grace: Duration)
where
    F: Future<Output = ()>,
{
    signal.await;
    info!(grace_secs = grace.as_secs_f32(), "No longer accepting connections");

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        if !shutdown.is_cancelled() {
            info!("Grace period over, cancelling in-flight scans");
            shutdown.cancel();
        }
    });
}
