//! Error types for the coordination engine.

use thiserror::Error;

/// Result type used throughout the coordination engine.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors produced by the task queue, peer view, and the periodic loops.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The local task queue is at `max_queue_size` and the task could not be admitted.
    #[error("queue full, task rejected")]
    QueueFull,

    /// A peer RPC (heartbeat, steal request) failed or timed out.
    #[error("peer request to {peer} failed: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    /// The peers file or a CLI/config argument was invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// An invariant the design requires to hold was violated. Reaching this
    /// variant indicates a bug in the admission or steal bookkeeping, not a
    /// transient condition.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}
