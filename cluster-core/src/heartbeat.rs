//! §4.4 sender side: broadcast this node's status to every configured peer
//! every `heartbeat_interval_ms`. Failures are logged and otherwise
//! ignored — the next tick retries naturally.

use crate::node::Node;
use crate::peer_client::PeerClient;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// One heartbeat broadcast: fan out to every peer but our own address.
pub async fn send_heartbeats_once(node: &Node, client: &dyn PeerClient) {
    let status = node.snapshot_status();
    for peer in node.config().peers_excluding_self() {
        if let Err(err) = client.send_heartbeat(peer, status.clone()).await {
            warn!(peer, error = %err, "heartbeat failed");
        }
    }
}

/// Spawn the periodic heartbeat sender. Exits as soon as `token` is cancelled.
pub fn spawn_heartbeat_loop(
    node: Arc<Node>,
    client: Arc<dyn PeerClient>,
    token: CancellationToken,
) -> JoinHandle<()> {
    let interval = node.config().heartbeat_interval();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {
                    send_heartbeats_once(&node, client.as_ref()).await;
                }
            }
        }
    })
}
