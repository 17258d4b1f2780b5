//! Pull-based work stealing: the underloaded-initiator side (`ShouldStealWork`
//! and the periodic tick) and the donor-side share calculation. The
//! network call itself goes through [`crate::peer_client::PeerClient`] so
//! this module stays transport-agnostic and unit-testable.

use crate::config::ClusterConfig;
use crate::node::Node;
use crate::peer_client::PeerClient;
use crate::task::{NodeStatus, WorkRequest};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// §4.7: how many tasks a donor with `queue_len` tasks should share for a
/// request capped at `max_tasks`, keeping at least `min_queue_length` for
/// itself. Integer truncation, as specified.
pub fn donor_share(queue_len: usize, min_queue_length: usize, max_tasks: usize) -> usize {
    if queue_len <= min_queue_length {
        return 0;
    }
    let excess_half = (queue_len - min_queue_length) / 2;
    excess_half.min(max_tasks)
}

/// §4.7 `ShouldStealWork`: true iff every guard holds.
pub fn should_steal_work(
    local_queue_len: usize,
    local_average_steal_count: f32,
    peer: &NodeStatus,
    cfg: &ClusterConfig,
) -> bool {
    let peer_queue_len = peer.queue_length as usize;

    if peer_queue_len <= cfg.min_queue_length {
        return false;
    }
    if local_queue_len >= cfg.max_queue_size {
        return false;
    }
    if peer_queue_len <= local_queue_len || peer_queue_len - local_queue_len <= 1 {
        return false;
    }
    if peer.cpu_utilization >= 80.0 {
        return false;
    }
    if local_average_steal_count >= cfg.max_steal_count as f32 {
        return false;
    }
    true
}

/// §4.7 initiator side, one tick: skip unless underfull, then try every
/// candidate peer in Peer View order.
pub async fn run_steal_tick_once(node: &Node, client: &dyn PeerClient) {
    let cfg = node.config();
    if node.queue_length() > cfg.min_queue_length {
        return;
    }

    for peer in node.peer_snapshot() {
        let local_len = node.queue_length();
        let avg = node.average_steal_count();
        if !should_steal_work(local_len, avg, &peer, cfg) {
            continue;
        }

        let request = WorkRequest {
            requester_id: cfg.node_id.clone(),
            max_tasks: cfg.max_tasks_to_steal,
            max_steal_count: cfg.max_steal_count,
        };

        match client.request_work(&peer.node_id, request).await {
            Ok(response) if response.success && !response.tasks.is_empty() => {
                debug!(donor = %peer.node_id, stolen = response.tasks.len(), "stole tasks");
                node.push_stolen_tasks(response.tasks);
            }
            Ok(_) => {
                debug!(donor = %peer.node_id, "steal request refused");
            }
            Err(err) => {
                warn!(donor = %peer.node_id, error = %err, "steal request failed");
            }
        }
    }
}

/// §4.6 step 1, the admission-path "try-steal" probe. Sorted by descending
/// queue length, mirroring the original eager-offload routine (see the
/// design note in DESIGN.md): it steals *into* the local queue even though
/// the overflow that triggered it is not, strictly speaking, relieved by
/// acquiring more tasks. Returns `true` iff at least one task was won.
pub async fn try_steal_for_admission(node: &Node, client: &dyn PeerClient) -> bool {
    let cfg = node.config();
    let mut candidates: Vec<NodeStatus> = node
        .peer_snapshot()
        .into_iter()
        .filter(|p| p.node_id != cfg.node_id && p.queue_length as usize > cfg.min_queue_length)
        .collect();
    candidates.sort_by(|a, b| b.queue_length.cmp(&a.queue_length));

    for peer in candidates {
        let request = WorkRequest {
            requester_id: cfg.node_id.clone(),
            max_tasks: cfg.max_tasks_to_steal,
            max_steal_count: cfg.max_steal_count,
        };

        match client.request_work(&peer.node_id, request).await {
            Ok(response) if response.success && !response.tasks.is_empty() => {
                debug!(donor = %peer.node_id, stolen = response.tasks.len(), "admission-path steal succeeded");
                node.push_stolen_tasks(response.tasks);
                return true;
            }
            Ok(_) => continue,
            Err(err) => {
                warn!(donor = %peer.node_id, error = %err, "admission-path steal failed");
                continue;
            }
        }
    }
    false
}

/// Spawn the periodic work-stealing initiator. Exits as soon as `token` is cancelled.
pub fn spawn_stealing_loop(
    node: Arc<Node>,
    client: Arc<dyn PeerClient>,
    token: CancellationToken,
) -> JoinHandle<()> {
    let interval = node.config().steal_interval();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {
                    run_steal_tick_once(&node, client.as_ref()).await;
                }
            }
        }
    })
}
