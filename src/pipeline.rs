//! Scan pipeline coordination.
//!
//! Wires the range expander and the worker pool together under one
//! cancellation token, applies the reporting policy and streams result
//! lines to a [`Reporter`] as they arrive.

use crate::error::{ConfigError, ConfigResult};
use crate::output::Reporter;
use crate::scanner::pool::{WorkerPool, DEFAULT_THREADS};
use crate::scanner::ranges::spawn_expander;
use crate::scanner::{Scanner, TcpConnectScanner};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Port ranges scanned when none are given.
pub const DEFAULT_PORTS: &str = "22-9999";

/// Default host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default per-port timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for one scan invocation. Read-only once the scan starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Host name or IP address to scan.
    pub host: String,
    /// Range tokens, expanded in this order.
    pub ports: Vec<String>,
    /// Upper bound for each connection attempt.
    pub timeout: Duration,
    /// Number of concurrent workers.
    pub threads: usize,
    /// Report failed ports too.
    pub verbose: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

impl ScanConfig {
    /// Create a configuration for `host` with default settings.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ports: vec![DEFAULT_PORTS.to_string()],
            timeout: DEFAULT_TIMEOUT,
            threads: DEFAULT_THREADS,
            verbose: false,
        }
    }

    /// Set the range tokens. An empty list keeps the default range.
    pub fn with_ports(mut self, ports: Vec<String>) -> Self {
        if !ports.is_empty() {
            self.ports = ports;
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reject configurations that cannot make progress.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue(
                "threads must be at least 1".to_string(),
            ));
        }
        if self.host.is_empty() {
            return Err(ConfigError::InvalidValue("host must not be empty".to_string()));
        }
        Ok(())
    }

    /// Whether a result line should be reported under this configuration.
    pub fn should_report(&self, open: bool) -> bool {
        self.verbose || open
    }
}

/// Counters for a finished (or cancelled) scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// Results received from the worker pool.
    pub scanned: usize,
    /// Results with a successful connection.
    pub open: usize,
    /// Lines handed to the reporter.
    pub reported: usize,
    /// The scan was stopped by cancellation before the ports ran out.
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// Runs one scan end to end.
///
/// Owns the cancellation token for the scan. Clones handed out by
/// [`Coordinator::cancel_token`] can stop the scan from elsewhere (for
/// example a Ctrl-C handler). The token is always cancelled on teardown.
pub struct Coordinator {
    config: Arc<ScanConfig>,
    scanner: Arc<dyn Scanner>,
    reporter: Arc<dyn Reporter>,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Coordinator using the TCP connect scanner for `config.host`.
    pub fn new(config: ScanConfig, reporter: Arc<dyn Reporter>) -> Self {
        let scanner = Arc::new(TcpConnectScanner::new(config.host.clone(), config.timeout));
        Self::with_scanner(config, scanner, reporter)
    }

    /// Coordinator using a caller-provided scanner.
    ///
    /// The scanner decides where and how long to dial; `config.host` and
    /// `config.timeout` are only used by [`Coordinator::new`] to build the
    /// TCP scanner and for reporting.
    pub fn with_scanner(
        config: ScanConfig,
        scanner: Arc<dyn Scanner>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            scanner,
            reporter,
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// A handle that cancels this scan when triggered.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the scan to completion or cancellation.
    pub async fn run(self) -> ScanSummary {
        let start = Instant::now();
        let cancel = self.cancel;
        let _teardown = cancel.clone().drop_guard();

        let (ports, expander) = spawn_expander(
            self.config.ports.clone(),
            Arc::clone(&self.reporter),
            cancel.clone(),
        );
        let mut results =
            WorkerPool::new(self.scanner, self.config.threads).run(ports, cancel.clone());

        let mut summary = ScanSummary::default();
        loop {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    summary.cancelled = true;
                    break;
                }
                result = results.recv() => match result {
                    Some(result) => result,
                    None => break,
                },
            };

            summary.scanned += 1;
            let open = result.is_open();
            if open {
                summary.open += 1;
            }
            if self.config.should_report(open) {
                self.reporter.result_line(&result.to_string());
                summary.reported += 1;
            }
        }

        cancel.cancel();
        if let Err(e) = expander.await {
            debug!(error = %e, "range expander task failed");
        }

        summary.elapsed = start.elapsed();
        info!(
            host = %self.config.host,
            scanned = summary.scanned,
            open = summary.open,
            cancelled = summary.cancelled,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "scan finished"
        );
        summary
    }
}

/// Convenience wrapper: scan with the TCP connect scanner.
pub async fn run_scan(config: ScanConfig, reporter: Arc<dyn Reporter>) -> ScanSummary {
    Coordinator::new(config, reporter).run().await
}
