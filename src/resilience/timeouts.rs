//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the client's first read, the origin connect and origin reads
//! - Report an elapsed deadline as an ordinary I/O error
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Elapsed deadlines surface as `io::ErrorKind::TimedOut` so callers handle them
//!   like any other connection fault

use std::future::Future;
use std::io;
use std::time::Duration;

/// Run an I/O future with a deadline.
///
/// `operation` names the guarded step in the resulting error message.
pub async fn with_timeout<F, T>(operation: &'static str, limit: Duration, fut: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("{operation} timed out after {}s", limit.as_secs_f64()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_within_deadline() {
        let value = with_timeout("noop", Duration::from_secs(1), async { Ok::<_, io::Error>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_deadline_is_timed_out() {
        let err = with_timeout("origin connect", Duration::from_secs(60), async {
            tokio::time::sleep(Duration::from_secs(120)).await;
            Ok::<_, io::Error>(())
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert!(err.to_string().starts_with("origin connect timed out"));
    }

    #[tokio::test]
    async fn inner_error_passes_through() {
        let err = with_timeout("read", Duration::from_secs(1), async {
            Err::<(), _>(io::Error::from(io::ErrorKind::ConnectionReset))
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
