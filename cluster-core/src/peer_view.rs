//! The node's local view of its peers.

use crate::task::NodeStatus;
use std::collections::HashMap;

/// `NodeIdentity -> last received NodeStatus`. Entries are never evicted in
/// this design (see the stale-peer design note); they are simply
/// overwritten on the next heartbeat from that peer.
pub type PeerView = HashMap<String, NodeStatus>;
