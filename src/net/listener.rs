//! TCP listener implementation.
//!
//! # Responsibilities
//! - Resolve and bind the configured host/port
//! - Enable address reuse and apply the configured backlog
//! - Accept incoming TCP connections

use std::net::SocketAddr;

use tokio::net::{lookup_host, TcpListener, TcpSocket, TcpStream};

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Bind host did not resolve to any address.
    Resolve(String, std::io::Error),
    /// Failed to bind to address.
    Bind(SocketAddr, std::io::Error),
    /// Failed to accept connection.
    Accept(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Resolve(host, e) => write!(f, "Failed to resolve {}: {}", host, e),
            ListenerError::Bind(addr, e) => write!(f, "Failed to bind {}: {}", addr, e),
            ListenerError::Accept(e) => write!(f, "Failed to accept: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListenerError::Resolve(_, e) | ListenerError::Bind(_, e) | ListenerError::Accept(e) => {
                Some(e)
            }
        }
    }
}

/// A TCP listener bound with `SO_REUSEADDR` and a fixed backlog.
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind to the configured address.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr = lookup_host((config.host.as_str(), config.port))
            .await
            .map_err(|e| ListenerError::Resolve(config.host.clone(), e))?
            .next()
            .ok_or_else(|| {
                ListenerError::Resolve(
                    config.host.clone(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses"),
                )
            })?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(|e| ListenerError::Bind(addr, e))?;

        socket
            .set_reuseaddr(true)
            .map_err(|e| ListenerError::Bind(addr, e))?;
        socket.bind(addr).map_err(|e| ListenerError::Bind(addr, e))?;
        let inner = socket
            .listen(config.backlog)
            .map_err(|e| ListenerError::Bind(addr, e))?;

        let local_addr = inner.local_addr().map_err(|e| ListenerError::Bind(addr, e))?;

        tracing::info!(
            address = %local_addr,
            backlog = config.backlog,
            "Listener bound"
        );

        Ok(Self { inner })
    }

    /// Accept a new connection.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;
        tracing::debug!(peer_addr = %addr, "Connection accepted");
        Ok((stream, addr))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }
}
