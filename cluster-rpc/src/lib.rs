//! gRPC transport for the coordination engine: the `tonic`/`prost` types
//! generated from `proto/cluster.proto`, conversions to and from
//! `cluster_core`'s transport-agnostic domain types, a
//! [`cluster_core::PeerClient`] implementation over real connections, and
//! the `NodeService` server wiring.

pub mod client;
pub mod convert;
pub mod service;

/// Generated message and client/server stubs.
pub mod proto {
    tonic::include_proto!("cluster");
}

pub use client::GrpcPeerClient;
pub use service::NodeServiceImpl;
