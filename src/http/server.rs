//! Accept loop.
//!
//! # Responsibilities
//! - Accept client connections from the listener
//! - Spawn one independent session task per connection
//! - Stop accepting when the shutdown signal fires
//!
//! # Design Decisions
//! - Sessions share nothing but the immutable config (`Arc<ProxyConfig>`)
//! - Accept errors are logged and the loop keeps going
//! - Shutdown closes the listener only; running sessions are neither joined nor cancelled

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::ProxyConfig;
use crate::http::session::ProxySession;
use crate::net::Listener;

/// The forwarding proxy server.
pub struct ProxyServer {
    config: Arc<ProxyConfig>,
}

impl ProxyServer {
    /// Create a new server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Accept connections until `shutdown` fires, then close the listener.
    pub async fn run(self, listener: Listener, mut shutdown: broadcast::Receiver<()>) {
        match listener.local_addr() {
            Ok(addr) => tracing::info!(address = %addr, "Proxy accepting connections"),
            Err(e) => tracing::warn!(error = %e, "Proxy accepting connections on unknown address"),
        }

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let session = ProxySession::new(Arc::clone(&self.config));
                        tokio::spawn(session.run(stream, peer));
                    }
                    Err(e) => tracing::warn!(error = %e, "Accept failed"),
                },
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, closing listener");
                    break;
                }
            }
        }

        drop(listener);
        tracing::info!("Proxy stopped");
    }
}
