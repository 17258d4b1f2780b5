//! Bounded FIFO task queue. Owned exclusively by [`crate::node::Node`] behind
//! `QueueLock`; this type itself performs no locking.

use crate::task::Task;
use std::collections::VecDeque;

/// A FIFO buffer capped at `capacity` entries.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tasks: VecDeque<Task>,
    capacity: usize,
}

impl TaskQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            tasks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.tasks.len() >= self.capacity
    }

    /// Push a task onto the tail. Returns `false` without mutating the queue
    /// if it is already at capacity.
    #[must_use]
    pub fn push(&mut self, task: Task) -> bool {
        if self.is_full() {
            return false;
        }
        self.tasks.push_back(task);
        true
    }

    /// Pop the head task, if any.
    pub fn pop(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    /// Push onto the tail regardless of capacity. Reserved for the
    /// privileged `TransferWork` path, which is by design not subject to
    /// the admission check (see the donor/initiator protocol in
    /// `stealing` for the capacity-respecting alternative).
    pub fn force_push(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    /// Average `steal_count` across all currently enqueued tasks, or `0.0`
    /// when the queue is empty (an empty queue cannot be "heavily stolen").
    pub fn average_steal_count(&self) -> f32 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        let total: u32 = self.tasks.iter().map(|t| t.steal_count).sum();
        total as f32 / self.tasks.len() as f32
    }

    /// Pop up to `count` tasks from the head, bumping each one's steal count.
    pub fn take_for_steal(&mut self, count: usize) -> Vec<Task> {
        let mut taken = Vec::with_capacity(count);
        for _ in 0..count {
            match self.tasks.pop_front() {
                Some(mut task) => {
                    task.mark_stolen();
                    taken.push(task);
                }
                None => break,
            }
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_respects_capacity() {
        let mut q = TaskQueue::new(2);
        assert!(q.push(Task::new(1, 10, "c")));
        assert!(q.push(Task::new(2, 10, "c")));
        assert!(!q.push(Task::new(3, 10, "c")));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn fifo_order_preserved() {
        let mut q = TaskQueue::new(4);
        q.push(Task::new(1, 10, "c"));
        q.push(Task::new(2, 10, "c"));
        assert_eq!(q.pop().unwrap().task_id, 1);
        assert_eq!(q.pop().unwrap().task_id, 2);
        assert!(q.pop().is_none());
    }

    #[test]
    fn take_for_steal_bumps_steal_count_and_respects_length() {
        let mut q = TaskQueue::new(10);
        for i in 0..3 {
            q.push(Task::new(i, 10, "c"));
        }
        let stolen = q.take_for_steal(2);
        assert_eq!(stolen.len(), 2);
        assert!(stolen.iter().all(|t| t.steal_count == 1));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn take_for_steal_stops_when_queue_runs_dry() {
        let mut q = TaskQueue::new(10);
        q.push(Task::new(1, 10, "c"));
        let stolen = q.take_for_steal(5);
        assert_eq!(stolen.len(), 1);
        assert!(q.is_empty());
    }

    #[test]
    fn average_steal_count_of_empty_queue_is_zero() {
        let q = TaskQueue::new(4);
        assert_eq!(q.average_steal_count(), 0.0);
    }
}
