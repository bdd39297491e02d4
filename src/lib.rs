//! # portscan - a concurrent TCP connect port scanner
//!
//! Given a host and a list of port range tokens (`"80"`, `"8000-8100"`),
//! portscan tries to open a TCP connection to every port, each attempt
//! bounded by a timeout, and streams one line per result.
//!
//! ## Pipeline
//!
//! A scan is three stages connected by bounded channels and sharing one
//! cancellation token:
//!
//! 1. the range expander turns tokens into ports, in order
//! 2. a fixed pool of workers dials those ports concurrently
//! 3. the coordinator drains results, applies the reporting policy and
//!    cancels everything on teardown
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portscan::output::ConsoleReporter;
//! use portscan::pipeline::{run_scan, ScanConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScanConfig::new("127.0.0.1")
//!         .with_ports(vec!["22".into(), "8000-8100".into()])
//!         .with_timeout(Duration::from_millis(500));
//!
//!     let summary = run_scan(config, Arc::new(ConsoleReporter)).await;
//!     println!("{} open", summary.open);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - port range tokens
//! - [`scanner`] - range expansion, worker pool and the TCP dialer
//! - [`pipeline`] - scan configuration and the coordinator
//! - [`output`] - result and diagnostic sinks
//! - [`config`] - settings file
//! - [`cli`] - command-line arguments
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, ScanError};
pub use pipeline::{run_scan, Coordinator, ScanConfig, ScanSummary};
pub use scanner::{PortResult, ScanOutcome, Scanner};
pub use types::{PortError, PortRange};
