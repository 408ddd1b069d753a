//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind with address reuse, accept)
//!     → Hand off to a proxy session (http::session)
//!     → relay.rs (byte pumps between client and origin)
//! ```
//!
//! # Design Decisions
//! - No connection limit beyond the listen backlog
//! - Relays own no sockets; sessions hand them stream halves

pub mod listener;
pub mod relay;

pub use listener::{Listener, ListenerError};
pub use relay::{relay, relay_with_idle_timeout, RelayEnd, RelayStats};
