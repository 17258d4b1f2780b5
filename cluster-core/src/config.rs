//! Tunable constants and periods for a node, assembled from defaults,
//! an optional file, environment variables, and CLI flags by the caller
//! (see `cluster-cli`). This module only owns the resolved shape and its
//! defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Weighting of queue length, CPU, and memory in [`crate::scoring::compute_score`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub queue_weight: f32,
    pub cpu_weight: f32,
    pub memory_weight: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            queue_weight: 0.3,
            cpu_weight: 0.4,
            memory_weight: 0.3,
        }
    }
}

/// Resolved configuration for a single node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// This node's listen address / identity.
    pub node_id: String,
    /// All other nodes in the cluster, by address.
    pub peers: Vec<String>,

    /// Capacity of the local task queue.
    pub max_queue_size: usize,
    /// Minimum tasks a donor retains after a steal.
    pub min_queue_length: usize,
    /// Per-request cap on tasks a donor will share.
    pub max_tasks_to_steal: u32,
    /// Steal-count ceiling past which a task is no longer worth stealing.
    pub max_steal_count: u32,

    pub score_weights: ScoreWeights,

    pub metrics_interval_ms: u64,
    pub heartbeat_interval_ms: u64,
    pub election_interval_ms: u64,
    pub steal_interval_ms: u64,
    pub worker_poll_interval_ms: u64,

    /// Client-side timeout for an outbound heartbeat RPC.
    pub heartbeat_timeout_ms: u64,
    /// Client-side timeout for an outbound steal (`RequestWork`) RPC.
    pub steal_timeout_ms: u64,
}

impl ClusterConfig {
    /// A config with the default constants for the given identity and peer set.
    pub fn new(node_id: impl Into<String>, peers: Vec<String>) -> Self {
        Self {
            node_id: node_id.into(),
            peers,
            max_queue_size: 10,
            min_queue_length: 2,
            max_tasks_to_steal: 3,
            max_steal_count: 3,
            score_weights: ScoreWeights::default(),
            metrics_interval_ms: 1_000,
            heartbeat_interval_ms: 2_000,
            election_interval_ms: 5_000,
            steal_interval_ms: 3_000,
            worker_poll_interval_ms: 100,
            heartbeat_timeout_ms: 2_000,
            steal_timeout_ms: 5_000,
        }
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn election_interval(&self) -> Duration {
        Duration::from_millis(self.election_interval_ms)
    }

    pub fn steal_interval(&self) -> Duration {
        Duration::from_millis(self.steal_interval_ms)
    }

    pub fn worker_poll_interval(&self) -> Duration {
        Duration::from_millis(self.worker_poll_interval_ms)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.heartbeat_timeout_ms)
    }

    pub fn steal_timeout(&self) -> Duration {
        Duration::from_millis(self.steal_timeout_ms)
    }

    /// Peers other than `node_id`, in file order.
    pub fn peers_excluding_self(&self) -> impl Iterator<Item = &str> {
        self.peers
            .iter()
            .map(String::as_str)
            .filter(move |p| *p != self.node_id)
    }
}
