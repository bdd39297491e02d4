//! Scanner module - the concurrent stages of a scan.
//!
//! - [`ranges`] expands range tokens into a stream of ports
//! - [`pool`] dials those ports with a fixed number of workers
//! - [`tcp`] is the connection attempt itself
//!
//! Stages hand data to each other over bounded tokio channels and stop
//! together when their shared cancellation token fires.

pub mod pool;
pub mod ranges;
pub mod tcp;
pub mod traits;

pub use pool::WorkerPool;
pub use ranges::{expand, spawn_expander};
pub use tcp::TcpConnectScanner;
pub use traits::{PortResult, ScanOutcome, Scanner};
