//! Forwarding HTTP proxy with CONNECT tunneling.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client                         forward-proxy                          Origin
//!     ──────┐   ┌──────────┐   ┌───────────┐   ┌───────────────┐
//!           └──▶│   net    │──▶│   http    │──▶│ http::request │
//!               │ listener │   │  server   │   │   (parse)     │
//!               └──────────┘   └─────┬─────┘   └───────────────┘
//!                                    │ one task per connection
//!                                    ▼
//!                             ┌─────────────┐  resolve + connect  ┌──────────┐
//!                             │http::session│────────────────────▶│  origin  │
//!                             └──────┬──────┘                     └──────────┘
//!                                    │
//!                   CONNECT ─────────┴───────── other methods
//!            confirmation + two relays      raw request + one relay
//!                       (net::relay)            (net::relay)
//! ```

pub mod config;
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::ProxyConfig;
pub use http::{ProxyServer, ProxySession};
pub use lifecycle::Shutdown;
