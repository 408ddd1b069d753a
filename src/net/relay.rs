//! One-directional byte relay.
//!
//! # Responsibilities
//! - Copy bytes from a source stream to a destination stream until end of stream
//! - Swallow I/O faults on either side (the relay just stops)
//! - Report what happened for logging
//!
//! # Design Decisions
//! - Fixed chunk size per read, every chunk written out fully before the next read
//! - No retries and no error propagation; a tunnel runs two independent relays

use std::fmt;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::resilience::timeouts::with_timeout;

/// How a relay stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEnd {
    /// Source returned a zero-length read.
    Eof,
    /// Reading from the source failed.
    ReadFault,
    /// Writing to the destination failed.
    WriteFault,
    /// No data arrived from the source within the idle timeout.
    IdleTimeout,
}

impl fmt::Display for RelayEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelayEnd::Eof => "eof",
            RelayEnd::ReadFault => "read fault",
            RelayEnd::WriteFault => "write fault",
            RelayEnd::IdleTimeout => "idle timeout",
        };
        f.write_str(s)
    }
}

/// Summary of a finished relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
    /// Bytes fully written to the destination.
    pub bytes: u64,
    pub end: RelayEnd,
}

/// Pump bytes from `source` to `destination` until end of stream or a fault.
pub async fn relay<W, R>(destination: &mut W, source: &mut R, chunk_size: usize) -> RelayStats
where
    W: AsyncWrite + Unpin + ?Sized,
    R: AsyncRead + Unpin + ?Sized,
{
    relay_with_idle_timeout(destination, source, chunk_size, None).await
}

/// Like [`relay`], but every read from `source` must complete within `idle_timeout`.
pub async fn relay_with_idle_timeout<W, R>(
    destination: &mut W,
    source: &mut R,
    chunk_size: usize,
    idle_timeout: Option<Duration>,
) -> RelayStats
where
    W: AsyncWrite + Unpin + ?Sized,
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut bytes = 0u64;

    let end = loop {
        let read = match idle_timeout {
            Some(limit) => with_timeout("relay read", limit, source.read(&mut buf)).await,
            None => source.read(&mut buf).await,
        };

        let n = match read {
            Ok(0) => break RelayEnd::Eof,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                tracing::debug!(error = %e, "Relay source idle");
                break RelayEnd::IdleTimeout;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Relay read failed");
                break RelayEnd::ReadFault;
            }
        };

        if let Err(e) = destination.write_all(&buf[..n]).await {
            tracing::debug!(error = %e, "Relay write failed");
            break RelayEnd::WriteFault;
        }
        bytes += n as u64;
    };

    tracing::trace!(bytes, end = %end, "Relay finished");
    RelayStats { bytes, end }
}
