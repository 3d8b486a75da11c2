//! Topology resolution and graph assembly for FabEdge clusters.
//!
//! Turns the loosely-typed records of a cluster (operator arguments, nodes,
//! communities, cluster records) into a typed model and an undirected graph
//! of which endpoints can reach which:
//!
//! ```text
//! operator args ──► ArgTable ──► ClusterConfig ──► EndpointFactory ──┐
//!                                                                    ├─► TopologyGraph ──► render
//! community records ──────────────────────────────► CommunityIndex ──┘
//! ```
//!
//! Everything here works on in-memory records; fetching them is the
//! caller's job.

#![forbid(unsafe_code)]

pub mod args;
pub mod cni;
pub mod community;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod graph;
pub mod render;
pub mod selector;
pub mod types;

pub use args::ArgTable;
pub use cni::{strategy_for, CniKind, PodSubnetStrategy};
pub use community::CommunityIndex;
pub use config::{ClusterConfig, ClusterInfo};
pub use endpoint::EndpointFactory;
pub use error::{Result, TopologyError};
pub use graph::{build_topology, TopologyBuilder, TopologyGraph};
pub use render::{RenderFormat, RenderOptions};
pub use selector::LabelSelector;
pub use types::{
    ClusterRecord, Community, DeploymentRecord, Endpoint, EndpointRecord, EndpointRole, NodeRecord,
};
