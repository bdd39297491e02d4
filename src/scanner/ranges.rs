//! Range expansion: turns range tokens into a stream of port numbers.
//!
//! Tokens are expanded lazily and in the order given, each range in
//! ascending order. Unparseable tokens are skipped after reporting a
//! `Cannot interpret range: <token>` diagnostic. Bounds outside the TCP
//! port domain are not an error; only the ports inside it are produced.
//! Ports are not deduplicated.

use crate::output::Reporter;
use crate::types::{PortError, PortRange};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Capacity of the hand-off queue between the expander and the workers.
///
/// Kept at one slot so the producer never runs ahead of the pool.
pub const PORT_QUEUE_CAPACITY: usize = 1;

/// Diagnostic text for a token that could not be parsed.
pub fn invalid_range_message(token: &str) -> String {
    format!("Cannot interpret range: {}", token)
}

/// Lazily expand `tokens` into port numbers.
///
/// `on_invalid` is called once per token that fails to parse, at the
/// point in the sequence where that token would have been expanded.
pub fn expand<'a, F>(tokens: &'a [String], mut on_invalid: F) -> impl Iterator<Item = u16> + 'a
where
    F: FnMut(&str, &PortError) + 'a,
{
    tokens
        .iter()
        .filter_map(move |token| match token.parse::<PortRange>() {
            Ok(range) => {
                if range.exceeds_port_domain() {
                    debug!(%range, "ports outside 0-65535 are not scanned");
                }
                Some(range)
            }
            Err(e) => {
                on_invalid(token, &e);
                None
            }
        })
        .flatten()
}

/// Spawn the producer task feeding ports into a bounded channel.
///
/// The channel closes when every token has been expanded or as soon as
/// `cancel` fires; a pending hand-off is abandoned on cancellation.
pub fn spawn_expander(
    tokens: Vec<String>,
    reporter: Arc<dyn Reporter>,
    cancel: CancellationToken,
) -> (mpsc::Receiver<u16>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(PORT_QUEUE_CAPACITY);

    let handle = tokio::spawn(async move {
        let ports = expand(&tokens, |token, e| {
            debug!(token, error = %e, "skipping range");
            reporter.diagnostic(&invalid_range_message(token));
        });

        let mut produced = 0usize;
        for port in ports {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(produced, "range expander cancelled");
                    return;
                }
                sent = tx.send(port) => {
                    if sent.is_err() {
                        debug!(produced, "port consumers went away");
                        return;
                    }
                    produced += 1;
                }
            }
        }
        debug!(produced, "range expander finished");
    });

    (rx, handle)
}
