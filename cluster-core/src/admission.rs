//! §4.6 `AssignTask`: the external entry point for submitting new work to a
//! node. Tries a direct admit first; if the queue is full, makes one
//! admission-path steal attempt (see [`crate::stealing::try_steal_for_admission`])
//! and rechecks before finally rejecting.

use crate::error::{ClusterError, Result};
use crate::node::Node;
use crate::peer_client::PeerClient;
use crate::task::Task;
use tracing::debug;

/// Submit `task` to `node`, honoring the admission-path steal fallback.
/// Returns `ClusterError::QueueFull` only if the queue is still full after
/// the steal attempt.
pub async fn assign_task(node: &Node, client: &dyn PeerClient, task: Task) -> Result<()> {
    if node.try_admit(task.clone()) {
        return Ok(());
    }

    debug!(task_id = task.task_id, "queue full, attempting admission-path steal");
    crate::stealing::try_steal_for_admission(node, client).await;

    if node.try_admit(task) {
        return Ok(());
    }

    Err(ClusterError::QueueFull)
}
