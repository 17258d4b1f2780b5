//! [`cluster_core::PeerClient`] over real gRPC connections. Channels are
//! lazily connected and cached per peer address so the periodic loops don't
//! pay a connection setup cost on every tick.

use async_trait::async_trait;
use cluster_core::error::{ClusterError, Result};
use cluster_core::task::{Ack, NodeStatus, WorkRequest, WorkResponse};
use cluster_core::PeerClient;
use dashmap::DashMap;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use crate::proto::node_service_client::NodeServiceClient;

/// A [`PeerClient`] that dials peers over gRPC, reusing connections.
pub struct GrpcPeerClient {
    channels: DashMap<String, Channel>,
    connect_timeout: Duration,
    heartbeat_timeout: Duration,
    steal_timeout: Duration,
}

impl GrpcPeerClient {
    pub fn new(connect_timeout: Duration, heartbeat_timeout: Duration, steal_timeout: Duration) -> Self {
        Self {
            channels: DashMap::new(),
            connect_timeout,
            heartbeat_timeout,
            steal_timeout,
        }
    }

    async fn channel_for(&self, peer: &str) -> Result<Channel> {
        if let Some(channel) = self.channels.get(peer) {
            return Ok(channel.clone());
        }

        let uri = format!("http://{peer}");
        let endpoint = Endpoint::from_shared(uri)
            .map_err(|e| ClusterError::PeerUnreachable {
                peer: peer.to_string(),
                reason: format!("invalid peer address: {e}"),
            })?
            .connect_timeout(self.connect_timeout);

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| ClusterError::PeerUnreachable {
                peer: peer.to_string(),
                reason: e.to_string(),
            })?;

        debug!(peer, "connected");
        self.channels.insert(peer.to_string(), channel.clone());
        Ok(channel)
    }
}

#[async_trait]
impl PeerClient for GrpcPeerClient {
    async fn send_heartbeat(&self, peer: &str, status: NodeStatus) -> Result<Ack> {
        let channel = self.channel_for(peer).await?;
        let mut client = NodeServiceClient::new(channel);
        let mut request = tonic::Request::new(status.into());
        request.set_timeout(self.heartbeat_timeout);

        let response = client
            .heartbeat(request)
            .await
            .map_err(|status| ClusterError::PeerUnreachable {
                peer: peer.to_string(),
                reason: status.message().to_string(),
            })?;
        Ok(response.into_inner().into())
    }

    async fn request_work(&self, peer: &str, request: WorkRequest) -> Result<WorkResponse> {
        let channel = self.channel_for(peer).await?;
        let mut client = NodeServiceClient::new(channel);
        let mut rpc_request = tonic::Request::new(request.into());
        rpc_request.set_timeout(self.steal_timeout);

        let response = client
            .request_work(rpc_request)
            .await
            .map_err(|status| ClusterError::PeerUnreachable {
                peer: peer.to_string(),
                reason: status.message().to_string(),
            })?;
        Ok(response.into_inner().into())
    }
}
