//! Scanner trait abstraction.
//!
//! Defines the connection-attempt seam used by the worker pool, so the
//! pool can be driven by the real TCP dialer or by a test double.

use async_trait::async_trait;
use std::fmt;

/// Outcome of a single connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The connection was established (and immediately released).
    Success,
    /// The attempt failed; the dial error text is kept verbatim.
    Failure(String),
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "OK"),
            Self::Failure(reason) => write!(f, "{}", reason),
        }
    }
}

/// Result of scanning a single port.
///
/// Displays as `"<port>: OK"` or `"<port>: <reason>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortResult {
    pub port: u16,
    pub outcome: ScanOutcome,
}

impl PortResult {
    pub fn success(port: u16) -> Self {
        Self {
            port,
            outcome: ScanOutcome::Success,
        }
    }

    pub fn failure(port: u16, reason: impl Into<String>) -> Self {
        Self {
            port,
            outcome: ScanOutcome::Failure(reason.into()),
        }
    }

    /// Check if the port accepted the connection.
    pub fn is_open(&self) -> bool {
        self.outcome == ScanOutcome::Success
    }
}

impl fmt::Display for PortResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.port, self.outcome)
    }
}

/// Trait for connection-attempt implementations.
///
/// An implementation is bound to one host and one timeout and must return
/// within roughly that timeout; it never reports an error other than as a
/// `Failure` outcome.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Attempt a connection to `port` on the configured host.
    async fn scan_port(&self, port: u16) -> PortResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_line_format() {
        assert_eq!(PortResult::success(22).to_string(), "22: OK");
        assert_eq!(
            PortResult::failure(23, "connection refused").to_string(),
            "23: connection refused"
        );
    }

    #[test]
    fn test_is_open() {
        assert!(PortResult::success(80).is_open());
        assert!(!PortResult::failure(80, "i/o timeout after 1s").is_open());
    }
}
