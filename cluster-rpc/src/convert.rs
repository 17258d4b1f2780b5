//! Infallible conversions between the wire shapes in `proto` and
//! `cluster_core`'s domain types. All fields round-trip exactly; nothing
//! here can fail, so these are plain `From` impls rather than `TryFrom`.

use crate::proto;
use cluster_core::task::{Ack, NodeStatus, Task, WorkRequest, WorkResponse};

impl From<Task> for proto::Task {
    fn from(t: Task) -> Self {
        proto::Task {
            task_id: t.task_id,
            duration_ms: t.duration_ms,
            source_node: t.source_node,
            steal_count: t.steal_count,
        }
    }
}

impl From<proto::Task> for Task {
    fn from(t: proto::Task) -> Self {
        Task {
            task_id: t.task_id,
            duration_ms: t.duration_ms,
            source_node: t.source_node,
            steal_count: t.steal_count,
        }
    }
}

impl From<NodeStatus> for proto::NodeStatus {
    fn from(s: NodeStatus) -> Self {
        proto::NodeStatus {
            node_id: s.node_id,
            score: s.score,
            queue_length: s.queue_length,
            cpu_utilization: s.cpu_utilization,
            memory_utilization: s.memory_utilization,
            last_heartbeat_time: s.last_heartbeat_time,
            is_leader: s.is_leader,
        }
    }
}

impl From<proto::NodeStatus> for NodeStatus {
    fn from(s: proto::NodeStatus) -> Self {
        NodeStatus {
            node_id: s.node_id,
            score: s.score,
            queue_length: s.queue_length,
            cpu_utilization: s.cpu_utilization,
            memory_utilization: s.memory_utilization,
            last_heartbeat_time: s.last_heartbeat_time,
            is_leader: s.is_leader,
        }
    }
}

impl From<Ack> for proto::Ack {
    fn from(a: Ack) -> Self {
        proto::Ack {
            message: a.message,
            success: a.success,
        }
    }
}

impl From<proto::Ack> for Ack {
    fn from(a: proto::Ack) -> Self {
        Ack {
            message: a.message,
            success: a.success,
        }
    }
}

impl From<WorkRequest> for proto::WorkRequest {
    fn from(r: WorkRequest) -> Self {
        proto::WorkRequest {
            requester_id: r.requester_id,
            max_tasks: r.max_tasks,
            max_steal_count: r.max_steal_count,
        }
    }
}

impl From<proto::WorkRequest> for WorkRequest {
    fn from(r: proto::WorkRequest) -> Self {
        WorkRequest {
            requester_id: r.requester_id,
            max_tasks: r.max_tasks,
            max_steal_count: r.max_steal_count,
        }
    }
}

impl From<WorkResponse> for proto::WorkResponse {
    fn from(r: WorkResponse) -> Self {
        proto::WorkResponse {
            success: r.success,
            tasks: r.tasks.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<proto::WorkResponse> for WorkResponse {
    fn from(r: proto::WorkResponse) -> Self {
        WorkResponse {
            success: r.success,
            tasks: r.tasks.into_iter().map(Into::into).collect(),
        }
    }
}
