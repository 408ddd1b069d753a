//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, one task per connection)
//!     → session.rs (first read, resolve, origin connect)
//!     → request.rs (request line, headers, Host → origin host/port)
//!     → CONNECT: response.rs confirmation + two relay directions
//!     → otherwise: raw request forwarded + one relay direction
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod session;

pub use request::{parse, Headers, MalformedRequest, ParsedRequest};
pub use server::ProxyServer;
pub use session::{ProxySession, SessionError, SessionOutcome};
