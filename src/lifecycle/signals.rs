//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for an interrupt (Ctrl+C / SIGINT)
//! - Translate it into a shutdown trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A failure to install the handler is logged and treated as an immediate interrupt

use crate::lifecycle::shutdown::Shutdown;

/// Resolve once the process receives an interrupt.
pub async fn wait_for_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Interrupt received");
}

/// Trigger `shutdown` when the process receives an interrupt.
pub async fn shutdown_on_interrupt(shutdown: Shutdown) {
    wait_for_interrupt().await;
    let notified = shutdown.trigger();
    tracing::debug!(subscribers = notified, "Shutdown triggered");
}
