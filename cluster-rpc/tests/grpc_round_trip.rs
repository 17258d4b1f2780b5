//! Binds a real `NodeService` server on loopback and drives it through
//! [`GrpcPeerClient`], exercising the wire encoding end to end.

use cluster_core::task::{NodeStatus, WorkRequest};
use cluster_core::{ClusterConfig, Node, PeerClient, Task};
use cluster_rpc::proto::node_service_server::NodeServiceServer;
use cluster_rpc::{GrpcPeerClient, NodeServiceImpl};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

struct NoopPeerClient;

#[async_trait::async_trait]
impl PeerClient for NoopPeerClient {
    async fn send_heartbeat(
        &self,
        _peer: &str,
        _status: NodeStatus,
    ) -> cluster_core::Result<cluster_core::task::Ack> {
        unreachable!("test server never originates outbound calls")
    }

    async fn request_work(
        &self,
        _peer: &str,
        _request: WorkRequest,
    ) -> cluster_core::Result<cluster_core::task::WorkResponse> {
        unreachable!("test server never originates outbound calls")
    }
}

async fn spawn_test_server(node: Arc<Node>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = NodeServiceImpl::new(node, Arc::new(NoopPeerClient));

    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(NodeServiceServer::new(service))
            .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    // Give the listener a moment to actually start accepting.
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

#[tokio::test]
async fn heartbeat_over_real_grpc_updates_peer_status() {
    let node = Arc::new(Node::new(ClusterConfig::new("server", vec!["server".into()])));
    node.try_admit(Task::new(1, 10, "server"));
    let addr = spawn_test_server(node.clone()).await;

    let client = GrpcPeerClient::new(
        Duration::from_secs(2),
        Duration::from_secs(2),
        Duration::from_secs(2),
    );

    let status = NodeStatus {
        node_id: "client".into(),
        score: 1.5,
        queue_length: 0,
        cpu_utilization: 10.0,
        memory_utilization: 20.0,
        last_heartbeat_time: 0,
        is_leader: false,
    };
    let ack = client
        .send_heartbeat(&addr.to_string(), status)
        .await
        .expect("heartbeat RPC should succeed");
    assert!(ack.success);
}

#[tokio::test]
async fn request_work_over_real_grpc_shares_tasks() {
    let node = Arc::new(Node::new(ClusterConfig::new("server", vec!["server".into()])));
    for i in 0..8 {
        node.try_admit(Task::new(i, 10, "server"));
    }
    let addr = spawn_test_server(node.clone()).await;

    let client = GrpcPeerClient::new(
        Duration::from_secs(2),
        Duration::from_secs(2),
        Duration::from_secs(2),
    );

    let response = client
        .request_work(
            &addr.to_string(),
            WorkRequest {
                requester_id: "client".into(),
                max_tasks: 3,
                max_steal_count: 3,
            },
        )
        .await
        .expect("request_work RPC should succeed");

    assert!(response.success);
    assert_eq!(response.tasks.len(), 3);
    assert_eq!(node.queue_length(), 5);
}
