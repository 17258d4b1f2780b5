//! The `NodeService` gRPC server: a thin `tonic` shim that converts wire
//! types and forwards every call to [`cluster_core::Node`] (and, for
//! `AssignTask`, the admission handler that may trigger a steal).

use crate::proto::node_service_server::NodeService;
use crate::proto::{
    Ack as ProtoAck, NodeStatus as ProtoNodeStatus, Task as ProtoTask, WorkRequest as ProtoWorkRequest,
    WorkResponse as ProtoWorkResponse,
};
use cluster_core::{ClusterError, Node, PeerClient};
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// Server-side implementation of the four-RPC `NodeService`.
pub struct NodeServiceImpl {
    node: Arc<Node>,
    peer_client: Arc<dyn PeerClient>,
}

impl NodeServiceImpl {
    pub fn new(node: Arc<Node>, peer_client: Arc<dyn PeerClient>) -> Self {
        Self { node, peer_client }
    }
}

impl From<ClusterError> for Status {
    fn from(err: ClusterError) -> Self {
        match err {
            ClusterError::QueueFull => Status::resource_exhausted(err.to_string()),
            ClusterError::PeerUnreachable { .. } => Status::unavailable(err.to_string()),
            ClusterError::Config(_) => Status::invalid_argument(err.to_string()),
            ClusterError::Invariant(_) => Status::internal(err.to_string()),
        }
    }
}

#[tonic::async_trait]
impl NodeService for NodeServiceImpl {
    async fn heartbeat(
        &self,
        request: Request<ProtoNodeStatus>,
    ) -> Result<Response<ProtoAck>, Status> {
        let status = request.into_inner().into();
        let ack = self.node.handle_heartbeat(status);
        Ok(Response::new(ack.into()))
    }

    async fn assign_task(
        &self,
        request: Request<ProtoTask>,
    ) -> Result<Response<ProtoAck>, Status> {
        let task = request.into_inner().into();
        match cluster_core::admission::assign_task(&self.node, self.peer_client.as_ref(), task).await {
            Ok(()) => Ok(Response::new(ProtoAck {
                message: "Task assigned successfully".into(),
                success: true,
            })),
            Err(err) => Err(err.into()),
        }
    }

    async fn request_work(
        &self,
        request: Request<ProtoWorkRequest>,
    ) -> Result<Response<ProtoWorkResponse>, Status> {
        let req = request.into_inner().into();
        let resp = self.node.handle_request_work(req);
        Ok(Response::new(resp.into()))
    }

    async fn transfer_work(
        &self,
        request: Request<ProtoTask>,
    ) -> Result<Response<ProtoAck>, Status> {
        let task = request.into_inner().into();
        let ack = self.node.force_push(task);
        Ok(Response::new(ack.into()))
    }
}
