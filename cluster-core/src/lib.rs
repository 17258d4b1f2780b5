//! The transport-agnostic coordination engine: the `Node` aggregate, its
//! `QueueLock`-protected state, and the five periodic behaviors
//! (metrics sampling, heartbeating, election, work stealing, and the
//! worker loop) that drive a cluster node. None of this crate depends on
//! `tonic`; `cluster-rpc` supplies the networked [`peer_client::PeerClient`]
//! implementation and the service that calls back into `Node`.

pub mod admission;
pub mod config;
pub mod election;
pub mod error;
pub mod heartbeat;
pub mod metrics;
pub mod node;
pub mod peer_client;
pub mod peer_view;
pub mod queue;
pub mod scoring;
pub mod stealing;
pub mod task;
pub mod worker;

pub use config::{ClusterConfig, ScoreWeights};
pub use error::{ClusterError, Result};
pub use node::{LeaderChange, Node};
pub use peer_client::PeerClient;
pub use task::{Ack, NodeStatus, Task, WorkRequest, WorkResponse};
