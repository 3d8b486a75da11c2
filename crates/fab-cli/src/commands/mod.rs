//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`topology`] - Topology diagram rendering
//! - [`edges`] - Edge node network information
//! - [`nodes`] - Network information for any node
//! - [`cluster_info`] - Cluster-wide FabEdge settings

pub mod cluster_info;
pub mod edges;
pub mod nodes;
pub mod topology;

pub use cluster_info::ClusterInfoCommand;
pub use edges::EdgesCommand;
pub use nodes::NodesCommand;
pub use topology::TopologyCommand;

use fab_topology::config::OPERATOR_DEPLOYMENT;
use fab_topology::{ClusterConfig, CommunityIndex, EndpointFactory, NodeRecord, TopologyError};
use tracing::warn;

use crate::error::CliError;
use crate::output::NodeReport;
use crate::store::ResourceStore;

/// Fetches a deployment, reporting absence as a configuration problem.
pub(crate) fn required_deployment<S: ResourceStore>(
    store: &S,
    name: &str,
) -> Result<fab_topology::DeploymentRecord, CliError> {
    store.get_deployment(name).map_err(|e| {
        CliError::from(TopologyError::ConfigExtraction(format!(
            "failed to get {name} deployment: {e}"
        )))
    })
}

/// Resolves the cluster configuration and loads communities.
pub(crate) fn load_cluster<S: ResourceStore>(store: &S) -> Result<(ClusterConfig, CommunityIndex), CliError> {
    let operator = required_deployment(store, OPERATOR_DEPLOYMENT)?;
    let config = ClusterConfig::from_deployment(&operator)?;
    let communities = CommunityIndex::load(store.list_communities()?);
    Ok((config, communities))
}

/// Fetches named nodes, reporting and skipping the ones that fail.
pub(crate) fn fetch_named_nodes<S: ResourceStore>(store: &S, names: &[String]) -> Vec<NodeRecord> {
    names
        .iter()
        .filter_map(|name| match store.get_node(name) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!(node = %name, error = %e, "skipping node");
                eprintln!("{e}");
                None
            }
        })
        .collect()
}

/// Builds the network report of one node.
pub(crate) fn node_report(
    config: &ClusterConfig,
    communities: &CommunityIndex,
    node: &NodeRecord,
    include_spec_cidrs: bool,
) -> NodeReport {
    let endpoint = EndpointFactory::new(config).build(node);

    NodeReport {
        name: node.name.clone(),
        public_addresses: endpoint.public_addresses,
        node_subnets: endpoint.node_subnets,
        spec_pod_cidrs: include_spec_cidrs.then(|| node.spec_pod_cidrs()),
        pod_cidrs: endpoint.pod_subnets,
        communities: communities.communities_of(&endpoint.name).to_vec(),
        peers: communities.peers_of(&endpoint.name),
    }
}
