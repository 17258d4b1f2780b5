//! Wire-shape-agnostic domain values shared by the coordination engine and
//! the RPC layer. `cluster-rpc` converts these to and from the generated
//! Protobuf types at the transport boundary; nothing in this crate depends
//! on `tonic` or `prost`.

use serde::{Deserialize, Serialize};

/// A unit of work. Cloned freely; mutation only ever bumps `steal_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: i32,
    pub duration_ms: u32,
    pub source_node: String,
    pub steal_count: u32,
}

impl Task {
    pub fn new(task_id: i32, duration_ms: u32, source_node: impl Into<String>) -> Self {
        Self {
            task_id,
            duration_ms,
            source_node: source_node.into(),
            steal_count: 0,
        }
    }

    /// Record that this task just crossed a steal boundary.
    pub fn mark_stolen(&mut self) {
        self.steal_count += 1;
    }
}

/// A per-heartbeat snapshot of a node's load and fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub node_id: String,
    pub score: f32,
    pub queue_length: u32,
    pub cpu_utilization: f32,
    pub memory_utilization: f32,
    /// Milliseconds since the Unix epoch.
    pub last_heartbeat_time: i64,
    pub is_leader: bool,
}

/// Generic acknowledgement returned by `Heartbeat`, `AssignTask`, and `TransferWork`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
    pub success: bool,
}

impl Ack {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

/// Request to borrow tasks from an overloaded peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRequest {
    pub requester_id: String,
    pub max_tasks: u32,
    pub max_steal_count: u32,
}

/// A donor's reply to a [`WorkRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkResponse {
    pub success: bool,
    pub tasks: Vec<Task>,
}

impl WorkResponse {
    pub fn empty() -> Self {
        Self {
            success: false,
            tasks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_stolen_increments_exactly_once() {
        let mut t = Task::new(1, 100, "client");
        assert_eq!(t.steal_count, 0);
        t.mark_stolen();
        assert_eq!(t.steal_count, 1);
        t.mark_stolen();
        assert_eq!(t.steal_count, 2);
    }
}
