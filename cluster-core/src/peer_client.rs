//! The coordination engine never speaks `tonic` directly: every outbound
//! call to a peer goes through this trait, implemented by `cluster-rpc`'s
//! gRPC client. That keeps the protocol logic testable in-process (swap in
//! a fake that never touches the network) while the real binary wires in
//! the networked implementation.

use crate::error::Result;
use crate::task::{Ack, NodeStatus, WorkRequest, WorkResponse};
use async_trait::async_trait;

/// Outbound calls a node makes to its peers.
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// Send our status to `peer`. Transport failures and timeouts are
    /// reported as [`crate::error::ClusterError::PeerUnreachable`]; callers
    /// are expected to log and continue rather than propagate.
    async fn send_heartbeat(&self, peer: &str, status: NodeStatus) -> Result<Ack>;

    /// Ask `peer` to share work with us.
    async fn request_work(&self, peer: &str, request: WorkRequest) -> Result<WorkResponse>;
}
