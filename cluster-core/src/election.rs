//! §4.5: every `election_interval_ms`, recompute the best-scoring node
//! across `{self} ∪ PeerView` and update the local leader opinion. Pure
//! function of locked state; the only I/O is the log event on change.

use crate::node::Node;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Spawn the periodic election loop. Exits as soon as `token` is cancelled.
pub fn spawn_election_loop(node: Arc<Node>, token: CancellationToken) -> JoinHandle<()> {
    let interval = node.config().election_interval();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {
                    if let Some(change) = node.run_election_tick() {
                        info!(
                            previous = %change.previous,
                            current = %change.current,
                            "new leader elected"
                        );
                    }
                }
            }
        }
    })
}
