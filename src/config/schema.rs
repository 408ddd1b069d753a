//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the forwarding proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind host, port, backlog).
    pub listener: ListenerConfig,

    /// Per-read buffer sizing.
    pub buffer: BufferConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// CONNECT tunnel behavior.
    pub tunnel: TunnelConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Per-read buffer size in bytes.
    pub fn buffer_size(&self) -> usize {
        self.buffer.size_kib * 1024
    }

    pub fn client_read_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.client_read_secs)
    }

    pub fn origin_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.origin_secs)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "0.0.0.0").
    pub host: String,

    /// Bind port. 0 picks an ephemeral port.
    pub port: u16,

    /// Pending connection backlog.
    pub backlog: u32,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            backlog: 5,
        }
    }
}

/// Buffer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Bytes requested per read, in KiB.
    pub size_kib: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { size_kib: 8 }
    }
}

/// Timeout configuration for session I/O.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for the client's first read in seconds.
    pub client_read_secs: u64,

    /// Origin connect and read deadline in seconds.
    pub origin_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            client_read_secs: 60,
            origin_secs: 60,
        }
    }
}

/// CONNECT tunnel configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TunnelConfig {
    /// Stop both relay directions as soon as either one ends.
    ///
    /// When false the origin → client direction runs detached and ends only on
    /// its own stream's outcome.
    pub linked_teardown: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
