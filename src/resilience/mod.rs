//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Session step with a deadline:
//!     → timeouts.rs (client first read, origin connect, origin reads)
//!     → On expiry: io::ErrorKind::TimedOut, handled as a connection fault
//! ```
//!
//! # Design Decisions
//! - Every blocking step on the inline path has a deadline
//! - No retries: a failed step ends its session

pub mod timeouts;
