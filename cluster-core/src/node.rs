//! `Node` is the aggregate that owns `QueueLock`: the task queue, the peer
//! view, the leader opinion, and the locally sampled metrics all live
//! behind one `parking_lot::Mutex`, matching the single coarse lock the
//! design calls for. Every method here is synchronous and never awaits
//! while the lock is held; the periodic loops and RPC handlers layer the
//! networked, async behavior on top (see `heartbeat`, `election`,
//! `stealing`, `admission`, `worker`).

use crate::config::ClusterConfig;
use crate::metrics::LocalMetrics;
use crate::peer_view::PeerView;
use crate::queue::TaskQueue;
use crate::scoring::compute_score;
use crate::task::{Ack, NodeStatus, Task, WorkRequest, WorkResponse};
use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

struct Inner {
    queue: TaskQueue,
    peer_view: PeerView,
    leader_id: String,
    is_leader: bool,
    metrics: LocalMetrics,
}

/// A single cluster node's coordination state.
pub struct Node {
    config: ClusterConfig,
    inner: Mutex<Inner>,
}

/// Returned by [`Node::run_election_tick`] when the leader opinion changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderChange {
    pub previous: String,
    pub current: String,
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

impl Node {
    pub fn new(config: ClusterConfig) -> Self {
        let leader_id = config.node_id.clone();
        let max_queue_size = config.max_queue_size;
        Self {
            inner: Mutex::new(Inner {
                queue: TaskQueue::new(max_queue_size),
                peer_view: PeerView::new(),
                leader_id,
                is_leader: true,
                metrics: LocalMetrics::default(),
            }),
            config,
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn queue_length(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn is_leader(&self) -> bool {
        self.inner.lock().is_leader
    }

    pub fn leader_id(&self) -> String {
        self.inner.lock().leader_id.clone()
    }

    /// Overwrite the sampled local metrics (called by the metrics sampler loop).
    pub fn set_local_metrics(&self, metrics: LocalMetrics) {
        self.inner.lock().metrics = metrics;
    }

    /// §4.3: recomputed on demand from the currently locked state, never cached.
    pub fn score(&self) -> f32 {
        let guard = self.inner.lock();
        compute_score(
            guard.queue.len(),
            guard.metrics.cpu_utilization,
            guard.metrics.memory_utilization,
            self.config.score_weights,
        )
    }

    /// Build the `NodeStatus` this node would advertise right now.
    pub fn snapshot_status(&self) -> NodeStatus {
        let guard = self.inner.lock();
        let score = compute_score(
            guard.queue.len(),
            guard.metrics.cpu_utilization,
            guard.metrics.memory_utilization,
            self.config.score_weights,
        );
        NodeStatus {
            node_id: self.config.node_id.clone(),
            score,
            queue_length: guard.queue.len() as u32,
            cpu_utilization: guard.metrics.cpu_utilization,
            memory_utilization: guard.metrics.memory_utilization,
            last_heartbeat_time: now_millis(),
            is_leader: guard.is_leader,
        }
    }

    /// §4.4 receiver: overwrite this peer's last-known status.
    pub fn handle_heartbeat(&self, status: NodeStatus) -> Ack {
        let node_id = status.node_id.clone();
        self.inner.lock().peer_view.insert(node_id.clone(), status);
        debug!(peer = %node_id, "recorded heartbeat");
        Ack::ok("ACK")
    }

    /// Attempt to push `task` directly, honoring `max_queue_size`. Returns
    /// `false` without mutating state if the queue is already full.
    #[must_use]
    pub fn try_admit(&self, task: Task) -> bool {
        self.inner.lock().queue.push(task)
    }

    /// §4.8: push unconditionally, bypassing the capacity check by design.
    pub fn force_push(&self, task: Task) -> Ack {
        let mut guard = self.inner.lock();
        guard.queue.force_push(task);
        Ack::ok("Work transferred")
    }

    /// Pop the next task for the worker loop to execute, if any.
    pub fn dequeue_for_worker(&self) -> Option<Task> {
        self.inner.lock().queue.pop()
    }

    /// §4.7 donor side.
    pub fn handle_request_work(&self, request: WorkRequest) -> WorkResponse {
        let mut guard = self.inner.lock();
        if guard.queue.len() <= self.config.min_queue_length {
            return WorkResponse::empty();
        }
        let share = crate::stealing::donor_share(
            guard.queue.len(),
            self.config.min_queue_length,
            request.max_tasks as usize,
        );
        if share == 0 {
            return WorkResponse::empty();
        }
        let tasks = guard.queue.take_for_steal(share);
        debug!(requester = %request.requester_id, shared = tasks.len(), "shared tasks via RequestWork");
        WorkResponse {
            success: true,
            tasks,
        }
    }

    /// Push tasks won from a peer (initiator side, after a successful steal).
    pub fn push_stolen_tasks(&self, tasks: Vec<Task>) {
        let mut guard = self.inner.lock();
        for task in tasks {
            let _ = guard.queue.push(task);
        }
    }

    /// A consistent snapshot of every peer's last-known status, for the
    /// election and stealing loops to scan without holding the lock while
    /// they do further work.
    pub fn peer_snapshot(&self) -> Vec<NodeStatus> {
        self.inner.lock().peer_view.values().cloned().collect()
    }

    pub fn average_steal_count(&self) -> f32 {
        self.inner.lock().queue.average_steal_count()
    }

    /// §4.5: one election tick. Returns `Some` iff the leader opinion changed.
    pub fn run_election_tick(&self) -> Option<LeaderChange> {
        let mut guard = self.inner.lock();
        let mut best_node = self.config.node_id.clone();
        let mut best_score = compute_score(
            guard.queue.len(),
            guard.metrics.cpu_utilization,
            guard.metrics.memory_utilization,
            self.config.score_weights,
        );

        for status in guard.peer_view.values() {
            if status.score > best_score {
                best_score = status.score;
                best_node = status.node_id.clone();
            }
        }

        guard.is_leader = best_node == self.config.node_id;

        if guard.leader_id != best_node {
            let previous = std::mem::replace(&mut guard.leader_id, best_node.clone());
            Some(LeaderChange {
                previous,
                current: best_node,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn node(id: &str, peers: Vec<&str>) -> Node {
        Node::new(ClusterConfig::new(
            id,
            peers.into_iter().map(String::from).collect(),
        ))
    }

    #[test]
    fn try_admit_respects_capacity() {
        let n = node("a", vec!["a"]);
        for i in 0..10 {
            assert!(n.try_admit(Task::new(i, 10, "c")));
        }
        assert!(!n.try_admit(Task::new(99, 10, "c")));
        assert_eq!(n.queue_length(), 10);
    }

    #[test]
    fn heartbeat_overwrites_peer_view_entry() {
        let n = node("a", vec!["a", "b"]);
        let mut status = NodeStatus {
            node_id: "b".into(),
            score: 1.0,
            queue_length: 0,
            cpu_utilization: 10.0,
            memory_utilization: 10.0,
            last_heartbeat_time: 0,
            is_leader: false,
        };
        n.handle_heartbeat(status.clone());
        status.queue_length = 5;
        n.handle_heartbeat(status.clone());
        let snap = n.peer_snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].queue_length, 5);
    }

    #[test]
    fn request_work_refuses_at_or_below_min_queue_length() {
        let n = node("a", vec!["a"]);
        n.try_admit(Task::new(1, 10, "c"));
        n.try_admit(Task::new(2, 10, "c"));
        let resp = n.handle_request_work(WorkRequest {
            requester_id: "b".into(),
            max_tasks: 3,
            max_steal_count: 3,
        });
        assert!(!resp.success);
        assert!(resp.tasks.is_empty());
        assert_eq!(n.queue_length(), 2);
    }

    #[test]
    fn request_work_shares_half_the_excess_and_keeps_the_minimum() {
        let n = node("a", vec!["a"]);
        for i in 0..8 {
            n.try_admit(Task::new(i, 10, "c"));
        }
        let resp = n.handle_request_work(WorkRequest {
            requester_id: "b".into(),
            max_tasks: 3,
            max_steal_count: 3,
        });
        assert!(resp.success);
        assert_eq!(resp.tasks.len(), 3);
        assert!(resp.tasks.iter().all(|t| t.steal_count == 1));
        assert_eq!(n.queue_length(), 5);
        assert!(n.queue_length() >= 2);
    }

    #[test]
    fn one_task_above_minimum_shares_nothing_and_reports_failure() {
        // MIN_QUEUE_LENGTH + 1 = 3 tasks, (3-2)/2 = 0 -> success must be false.
        let n = node("a", vec!["a"]);
        for i in 0..3 {
            n.try_admit(Task::new(i, 10, "c"));
        }
        let resp = n.handle_request_work(WorkRequest {
            requester_id: "b".into(),
            max_tasks: 3,
            max_steal_count: 3,
        });
        assert!(!resp.success);
        assert!(resp.tasks.is_empty());
        assert_eq!(n.queue_length(), 3);
    }

    #[test]
    fn election_picks_strict_max_and_self_wins_ties() {
        let n = node("a", vec!["a", "b"]);
        n.handle_heartbeat(NodeStatus {
            node_id: "b".into(),
            score: n.score(), // exact tie
            queue_length: 0,
            cpu_utilization: 0.0,
            memory_utilization: 0.0,
            last_heartbeat_time: 0,
            is_leader: false,
        });
        n.run_election_tick();
        assert_eq!(n.leader_id(), "a");
        assert!(n.is_leader());
    }

    #[test]
    fn election_defers_to_a_strictly_better_peer() {
        let n = node("a", vec!["a", "b"]);
        n.handle_heartbeat(NodeStatus {
            node_id: "b".into(),
            score: n.score() + 1.0,
            queue_length: 0,
            cpu_utilization: 0.0,
            memory_utilization: 0.0,
            last_heartbeat_time: 0,
            is_leader: false,
        });
        let change = n.run_election_tick();
        assert_eq!(n.leader_id(), "b");
        assert!(!n.is_leader());
        assert_eq!(
            change,
            Some(LeaderChange {
                previous: "a".into(),
                current: "b".into(),
            })
        );
    }

    #[test]
    fn election_tick_is_a_noop_when_leader_is_unchanged() {
        let n = node("a", vec!["a"]);
        assert_eq!(n.run_election_tick(), None);
    }

    #[test]
    fn force_push_bypasses_capacity() {
        let n = node("a", vec!["a"]);
        for i in 0..10 {
            assert!(n.try_admit(Task::new(i, 10, "c")));
        }
        let ack = n.force_push(Task::new(99, 10, "c"));
        assert!(ack.success);
        assert_eq!(n.queue_length(), 11);
    }
}
