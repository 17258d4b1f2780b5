//! §4.1: the single long-running consumer. Polls rather than waits on a
//! condvar, by design — see the rationale in SPEC_FULL.md §4.1 — so the
//! only synchronization primitive in play is `QueueLock` itself.

use crate::node::Node;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Execute one task by simulating its declared duration.
async fn run_task(node_id: &str, task: &crate::task::Task) {
    debug!(
        task_id = task.task_id,
        duration_ms = task.duration_ms,
        source = %task.source_node,
        steal_count = task.steal_count,
        node = node_id,
        "executing task"
    );
    tokio::time::sleep(std::time::Duration::from_millis(task.duration_ms as u64)).await;
    debug!(task_id = task.task_id, node = node_id, "task complete");
}

/// Spawn the worker loop. Exits as soon as `token` is cancelled (it will
/// finish any task already popped before checking again).
pub fn spawn_worker_loop(node: Arc<Node>, token: CancellationToken) -> JoinHandle<()> {
    let poll_interval = node.config().worker_poll_interval();
    tokio::spawn(async move {
        loop {
            if token.is_cancelled() {
                break;
            }
            match node.dequeue_for_worker() {
                Some(task) => run_task(&node.config().node_id, &task).await,
                None => {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tokio::time::sleep(poll_interval) => {}
                    }
                }
            }
        }
    })
}
