//! TCP Connect Scanner implementation.
//!
//! Performs standard TCP connect attempts using the operating system's
//! socket API. Host name resolution happens inside the attempt, so it is
//! bounded by the same timeout as the handshake.

use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::{PortResult, Scanner};
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP Connect Scanner.
///
/// Does not require elevated privileges. A successful connection is
/// dropped right away; nothing is sent over it.
#[derive(Debug, Clone)]
pub struct TcpConnectScanner {
    host: String,
    timeout: Duration,
}

impl TcpConnectScanner {
    /// Create a new TCP connect scanner.
    ///
    /// # Arguments
    /// * `host` - Host name or IP address to scan
    /// * `timeout` - Upper bound per connection attempt
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            timeout,
        }
    }

    /// Attempt to connect to `host:port`.
    async fn attempt_connect(&self, port: u16) -> ScanResult<TcpStream> {
        match timeout(self.timeout, TcpStream::connect((self.host.as_str(), port))).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ScanError::Io(e)),
            Err(_) => Err(ScanError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl Scanner for TcpConnectScanner {
    async fn scan_port(&self, port: u16) -> PortResult {
        match self.attempt_connect(port).await {
            Ok(stream) => {
                drop(stream);
                trace!(port, "connected");
                PortResult::success(port)
            }
            Err(e) => {
                trace!(port, error = %e, "connect failed");
                PortResult::failure(port, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::traits::ScanOutcome;
    use tokio::net::TcpListener;

    #[test]
    fn test_scanner_creation() {
        let scanner = TcpConnectScanner::new("127.0.0.1", Duration::from_secs(1));
        assert_eq!(scanner.host, "127.0.0.1");
        assert_eq!(scanner.timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_scan_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let scanner = TcpConnectScanner::new("127.0.0.1", Duration::from_secs(2));
        let result = scanner.scan_port(port).await;

        assert_eq!(result, PortResult::success(port));
        assert_eq!(result.to_string(), format!("{}: OK", port));
    }

    #[tokio::test]
    async fn test_scan_closed_port() {
        // Bind then drop to get a port that is very likely closed.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let scanner = TcpConnectScanner::new("127.0.0.1", Duration::from_millis(500));
        let result = scanner.scan_port(port).await;

        assert_eq!(result.port, port);
        assert!(matches!(result.outcome, ScanOutcome::Failure(ref reason) if !reason.is_empty()));
    }
}
