//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Listener, sessions and relays produce:
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → stdout via tracing-subscriber's fmt layer
//! ```
//!
//! # Design Decisions
//! - Structured fields (session id, peer, origin, byte counts) rather than formatted text
//! - Faults contained in a session are logged, never surfaced to the client

pub mod logging;
