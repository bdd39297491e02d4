//! Worker pool: fans ports out to a fixed number of concurrent dialers
//! and fans their results back into a single stream.

use crate::scanner::traits::{PortResult, Scanner};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

/// Capacity of the queue between the workers and the result consumer.
pub const RESULT_QUEUE_CAPACITY: usize = 1;

/// Default number of concurrent workers.
pub const DEFAULT_THREADS: usize = 100;

/// A fixed-size pool of workers sharing one scanner.
pub struct WorkerPool<S: ?Sized> {
    scanner: Arc<S>,
    threads: usize,
}

impl<S: Scanner + ?Sized + 'static> WorkerPool<S> {
    /// Create a pool that will run `threads` workers against `scanner`.
    pub fn new(scanner: Arc<S>, threads: usize) -> Self {
        Self { scanner, threads }
    }

    /// Start the workers and return the combined result stream.
    ///
    /// Each port received from `ports` is scanned by exactly one worker and
    /// yields exactly one result, unless cancellation discards it. The
    /// returned receiver ends only after every worker has terminated.
    pub fn run(
        self,
        ports: mpsc::Receiver<u16>,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<PortResult> {
        let (tx, rx) = mpsc::channel(RESULT_QUEUE_CAPACITY);
        let ports = Arc::new(Mutex::new(ports));

        let mut workers = JoinSet::new();
        for id in 0..self.threads {
            workers.spawn(worker(
                id,
                Arc::clone(&self.scanner),
                Arc::clone(&ports),
                tx.clone(),
                cancel.clone(),
            ));
        }

        // The supervisor owns the last sender: the stream closes once it has
        // joined every worker.
        tokio::spawn(async move {
            let mut scanned = 0usize;
            while let Some(joined) = workers.join_next().await {
                match joined {
                    Ok(count) => scanned += count,
                    Err(e) => error!(error = %e, "scan worker failed"),
                }
            }
            debug!(scanned, "all workers finished");
            drop(tx);
        });

        rx
    }
}

/// Worker loop. Returns the number of ports it scanned.
async fn worker<S: Scanner + ?Sized>(
    id: usize,
    scanner: Arc<S>,
    ports: Arc<Mutex<mpsc::Receiver<u16>>>,
    results: mpsc::Sender<PortResult>,
    cancel: CancellationToken,
) -> usize {
    trace!(worker = id, "worker started");
    let mut scanned = 0usize;

    loop {
        let port = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            port = next_port(&ports) => match port {
                Some(port) => port,
                None => break,
            },
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = scanner.scan_port(port) => result,
        };
        scanned += 1;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = results.send(result) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    trace!(worker = id, scanned, "worker stopped");
    scanned
}

/// Take the next port off the shared queue.
///
/// The lock is released before the port is scanned.
async fn next_port(ports: &Mutex<mpsc::Receiver<u16>>) -> Option<u16> {
    ports.lock().await.recv().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::traits::ScanOutcome;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Succeeds on even ports, fails on odd ones.
    struct EvenScanner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Scanner for EvenScanner {
        async fn scan_port(&self, port: u16) -> PortResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if port % 2 == 0 {
                PortResult::success(port)
            } else {
                PortResult::failure(port, format!("refused {}", port))
            }
        }
    }

    /// Never finishes on its own.
    struct HangingScanner;

    #[async_trait]
    impl Scanner for HangingScanner {
        async fn scan_port(&self, port: u16) -> PortResult {
            std::future::pending::<()>().await;
            PortResult::success(port)
        }
    }

    fn feed(ports: Vec<u16>) -> mpsc::Receiver<u16> {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            for port in ports {
                if tx.send(port).await.is_err() {
                    return;
                }
            }
        });
        rx
    }

    async fn collect(mut rx: mpsc::Receiver<PortResult>) -> Vec<PortResult> {
        let mut out = Vec::new();
        while let Some(r) = rx.recv().await {
            out.push(r);
        }
        out
    }

    #[tokio::test]
    async fn test_each_port_scanned_exactly_once() {
        let scanner = Arc::new(EvenScanner {
            calls: AtomicUsize::new(0),
        });
        let ports: Vec<u16> = (1..=500).collect();
        let pool = WorkerPool::new(Arc::clone(&scanner), 16);

        let results = collect(pool.run(feed(ports.clone()), CancellationToken::new())).await;

        assert_eq!(results.len(), ports.len());
        assert_eq!(scanner.calls.load(Ordering::SeqCst), ports.len());

        let mut seen: Vec<u16> = results.iter().map(|r| r.port).collect();
        seen.sort_unstable();
        assert_eq!(seen, ports);
    }

    #[tokio::test]
    async fn test_failure_reason_passed_through() {
        let scanner = Arc::new(EvenScanner {
            calls: AtomicUsize::new(0),
        });
        let pool = WorkerPool::new(scanner, 3);

        let results = collect(pool.run(feed(vec![7, 8]), CancellationToken::new())).await;
        let by_port: HashMap<u16, ScanOutcome> =
            results.into_iter().map(|r| (r.port, r.outcome)).collect();

        assert_eq!(by_port[&8], ScanOutcome::Success);
        assert_eq!(by_port[&7], ScanOutcome::Failure("refused 7".into()));
    }

    #[tokio::test]
    async fn test_duplicate_ports_each_produce_a_result() {
        let scanner = Arc::new(EvenScanner {
            calls: AtomicUsize::new(0),
        });
        let pool = WorkerPool::new(scanner, 4);

        let results = collect(pool.run(feed(vec![10, 10, 10]), CancellationToken::new())).await;
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_more_workers_than_ports() {
        let scanner = Arc::new(EvenScanner {
            calls: AtomicUsize::new(0),
        });
        let pool = WorkerPool::new(scanner, 100);

        let results = collect(pool.run(feed(vec![2]), CancellationToken::new())).await;
        assert_eq!(results, vec![PortResult::success(2)]);
    }

    #[tokio::test]
    async fn test_empty_input_closes_stream() {
        let scanner = Arc::new(EvenScanner {
            calls: AtomicUsize::new(0),
        });
        let pool = WorkerPool::new(scanner, 8);

        let results = collect(pool.run(feed(Vec::new()), CancellationToken::new())).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_stops_in_flight_dials() {
        let pool = WorkerPool::new(Arc::new(HangingScanner), 4);
        let cancel = CancellationToken::new();
        let rx = pool.run(feed((1..=100).collect()), cancel.clone());

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let results = tokio::time::timeout(Duration::from_secs(1), collect(rx))
            .await
            .expect("result stream did not close after cancellation");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_while_blocked_on_send() {
        let scanner = Arc::new(EvenScanner {
            calls: AtomicUsize::new(0),
        });
        let pool = WorkerPool::new(scanner, 4);
        let cancel = CancellationToken::new();
        let mut rx = pool.run(feed((0..1000).collect()), cancel.clone());

        // Take one result, then stop draining: workers park on the send.
        assert!(rx.recv().await.is_some());
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let rest = tokio::time::timeout(Duration::from_secs(1), collect(rx))
            .await
            .expect("workers did not observe cancellation");
        assert!(rest.len() <= RESULT_QUEUE_CAPACITY);
    }
}
