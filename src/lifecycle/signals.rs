//! OS signal handling.

/// Resolve when the process receives an interrupt (Ctrl+C / SIGINT).
///
/// If the handler cannot be installed the future never resolves, so the
/// caller keeps running rather than stopping spuriously.
pub async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
