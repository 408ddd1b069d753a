//! Per-connection proxy session.
//!
//! # Responsibilities
//! - Read and parse the client's first request head
//! - Resolve and connect to the origin
//! - CONNECT: confirm, then relay both directions
//! - Otherwise: forward the raw request and relay the response back
//!
//! # Design Decisions
//! - The session owns both sockets; dropping them closes them on every exit path
//! - Faults end the session silently: nothing is written to the client on failure
//! - No retries at any step

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tracing::Instrument;

use crate::config::ProxyConfig;
use crate::http::request::{self, MalformedRequest, ParsedRequest};
use crate::http::response::connect_established;
use crate::net::relay::{relay, relay_with_idle_timeout, RelayStats};
use crate::resilience::timeouts::with_timeout;

/// Relaxed ordering is enough: ids only need to be unique.
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a session, used in log spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next() -> Self {
        Self(SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Which end of the session an I/O fault happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Client,
    Origin,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Client => f.write_str("client"),
            Side::Origin => f.write_str("origin"),
        }
    }
}

/// Direction of a relay inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client → origin.
    Upstream,
    /// Origin → client.
    Downstream,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upstream => f.write_str("client->origin"),
            Direction::Downstream => f.write_str("origin->client"),
        }
    }
}

/// Why a session ended early. Contained in the session; only ever logged.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("client disconnected before sending a request")]
    ClientDisconnected,

    #[error("failed to read request: {0}")]
    ClientRead(#[source] io::Error),

    #[error("malformed request: {0}")]
    MalformedRequest(#[from] MalformedRequest),

    #[error("cannot resolve {host}:{port}: {reason}")]
    AddressResolution {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("{side} connection fault: {source}")]
    Connection {
        side: Side,
        #[source]
        source: io::Error,
    },
}

impl SessionError {
    fn origin(source: io::Error) -> Self {
        SessionError::Connection {
            side: Side::Origin,
            source,
        }
    }

    fn client(source: io::Error) -> Self {
        SessionError::Connection {
            side: Side::Client,
            source,
        }
    }
}

/// How a session that reached its relay phase finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Plain request forwarded; `response` covers origin → client.
    Forwarded { response: RelayStats },
    /// CONNECT tunnel; `stats` belongs to the direction that ended the session.
    Tunneled {
        direction: Direction,
        stats: RelayStats,
    },
}

/// Handles one accepted client connection from first read to close.
pub struct ProxySession {
    id: SessionId,
    config: Arc<ProxyConfig>,
}

impl ProxySession {
    pub fn new(config: Arc<ProxyConfig>) -> Self {
        Self {
            id: SessionId::next(),
            config,
        }
    }

    /// Run the session inside its log span and record how it ended.
    pub async fn run(self, client: TcpStream, peer: SocketAddr) {
        let span = tracing::info_span!("session", id = %self.id, peer = %peer);
        async move {
            match self.handle(client).await {
                Ok(outcome) => tracing::debug!(?outcome, "Session finished"),
                Err(SessionError::ClientDisconnected) => {
                    tracing::debug!("Client closed before sending a request")
                }
                Err(e) => tracing::warn!(error = %e, "Session aborted"),
            }
        }
        .instrument(span)
        .await
    }

    /// Drive one client connection to completion.
    ///
    /// Both connections are closed when this returns, whatever the result.
    pub async fn handle(self, mut client: TcpStream) -> Result<SessionOutcome, SessionError> {
        let request = self.read_request(&mut client).await?;
        tracing::debug!(
            method = %String::from_utf8_lossy(request.method()),
            target = %String::from_utf8_lossy(request.target()),
            "Request parsed"
        );

        let addr = resolve(&request).await?;
        let origin = with_timeout(
            "origin connect",
            self.config.origin_timeout(),
            TcpStream::connect(addr),
        )
        .await
        .map_err(SessionError::origin)?;
        tracing::debug!(origin = %addr, "Origin connected");

        if request.is_connect() {
            self.tunnel(client, origin, &request).await
        } else {
            self.forward(client, origin, &request).await
        }
    }

    async fn read_request(&self, client: &mut TcpStream) -> Result<ParsedRequest, SessionError> {
        let mut buf = BytesMut::zeroed(self.config.buffer_size());
        let n = with_timeout(
            "client read",
            self.config.client_read_timeout(),
            client.read(&mut buf),
        )
        .await
        .map_err(SessionError::ClientRead)?;

        if n == 0 {
            return Err(SessionError::ClientDisconnected);
        }
        buf.truncate(n);
        Ok(request::parse(buf.freeze())?)
    }

    async fn forward(
        &self,
        mut client: TcpStream,
        mut origin: TcpStream,
        request: &ParsedRequest,
    ) -> Result<SessionOutcome, SessionError> {
        let timeout = self.config.origin_timeout();
        with_timeout("origin write", timeout, origin.write_all(request.raw()))
            .await
            .map_err(SessionError::origin)?;

        let response = relay_with_idle_timeout(
            &mut client,
            &mut origin,
            self.config.buffer_size(),
            Some(timeout),
        )
        .await;
        Ok(SessionOutcome::Forwarded { response })
    }

    async fn tunnel(
        &self,
        mut client: TcpStream,
        origin: TcpStream,
        request: &ParsedRequest,
    ) -> Result<SessionOutcome, SessionError> {
        client
            .write_all(&connect_established(request.version()))
            .await
            .map_err(SessionError::client)?;

        let chunk_size = self.config.buffer_size();
        let idle = Some(self.config.client_read_timeout());
        let (mut client_read, mut client_write) = client.into_split();
        let (mut origin_read, mut origin_write) = origin.into_split();

        if self.config.tunnel.linked_teardown {
            let upstream =
                relay_with_idle_timeout(&mut origin_write, &mut client_read, chunk_size, idle);
            let downstream = relay(&mut client_write, &mut origin_read, chunk_size);
            let (direction, stats) = tokio::select! {
                stats = upstream => (Direction::Upstream, stats),
                stats = downstream => (Direction::Downstream, stats),
            };
            return Ok(SessionOutcome::Tunneled { direction, stats });
        }

        let downstream = tokio::spawn(
            async move {
                let stats = relay(&mut client_write, &mut origin_read, chunk_size).await;
                tracing::debug!(
                    direction = %Direction::Downstream,
                    bytes = stats.bytes,
                    end = %stats.end,
                    "Tunnel direction finished"
                );
            }
            .in_current_span(),
        );

        let stats =
            relay_with_idle_timeout(&mut origin_write, &mut client_read, chunk_size, idle).await;
        // The spawned task holds the client's write half; aborting it closes the client.
        downstream.abort();
        Ok(SessionOutcome::Tunneled {
            direction: Direction::Upstream,
            stats,
        })
    }
}

/// Resolve the request's origin, keeping the first address returned.
async fn resolve(request: &ParsedRequest) -> Result<SocketAddr, SessionError> {
    let port = request.port();
    let lossy_host = || String::from_utf8_lossy(request.host()).into_owned();

    let host = std::str::from_utf8(request.host()).map_err(|_| SessionError::AddressResolution {
        host: lossy_host(),
        port,
        reason: "host is not valid UTF-8".to_string(),
    })?;

    lookup_host((host, port))
        .await
        .map_err(|e| SessionError::AddressResolution {
            host: host.to_string(),
            port,
            reason: e.to_string(),
        })?
        .next()
        .ok_or_else(|| SessionError::AddressResolution {
            host: host.to_string(),
            port,
            reason: "no addresses returned".to_string(),
        })
}
