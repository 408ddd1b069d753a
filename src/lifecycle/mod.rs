//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Apply overrides → Validate → Init logging → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Close listener → Exit
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Shutdown only stops accepting; in-flight sessions are not drained or cancelled

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
