//! Access to cluster resources.
//!
//! Commands read deployments, nodes, communities and cluster records through
//! [`ResourceStore`]. [`SnapshotStore`] serves them from a JSON document
//! exported from the platform.

use std::path::Path;

use fab_topology::{
    ClusterRecord, Community, DeploymentRecord, LabelSelector, NodeRecord, TopologyError,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliError;

type FetchResult<T> = Result<T, TopologyError>;

/// Read-only view of a cluster's resources.
pub trait ResourceStore {
    /// Fetches a deployment in the FabEdge namespace.
    fn get_deployment(&self, name: &str) -> FetchResult<DeploymentRecord>;

    /// Fetches a node by name.
    fn get_node(&self, name: &str) -> FetchResult<NodeRecord>;

    /// Lists nodes whose labels match `selector`.
    fn list_nodes(&self, selector: &LabelSelector) -> FetchResult<Vec<NodeRecord>>;

    /// Lists all communities.
    fn list_communities(&self) -> FetchResult<Vec<Community>>;

    /// Lists all cluster records.
    fn list_clusters(&self) -> FetchResult<Vec<ClusterRecord>>;
}

/// Serialized resources of one cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Deployments, across namespaces.
    #[serde(default)]
    pub deployments: Vec<DeploymentRecord>,
    /// Nodes.
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    /// Communities.
    #[serde(default)]
    pub communities: Vec<Community>,
    /// Cluster records.
    #[serde(default)]
    pub clusters: Vec<ClusterRecord>,
}

/// [`ResourceStore`] over a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    namespace: String,
    snapshot: Snapshot,
}

impl SnapshotStore {
    /// Wraps an in-memory snapshot.
    pub fn new(namespace: impl Into<String>, snapshot: Snapshot) -> Self {
        Self {
            namespace: namespace.into(),
            snapshot,
        }
    }

    /// Loads a snapshot from a JSON file.
    pub fn load(namespace: impl Into<String>, path: &Path) -> Result<Self, CliError> {
        let data = std::fs::read(path).map_err(|e| {
            CliError::Config(format!("cannot read snapshot {}: {e}", path.display()))
        })?;
        let snapshot: Snapshot = serde_json::from_slice(&data)?;

        debug!(
            path = %path.display(),
            deployments = snapshot.deployments.len(),
            nodes = snapshot.nodes.len(),
            communities = snapshot.communities.len(),
            clusters = snapshot.clusters.len(),
            "loaded snapshot"
        );
        Ok(Self::new(namespace, snapshot))
    }
}

impl ResourceStore for SnapshotStore {
    fn get_deployment(&self, name: &str) -> FetchResult<DeploymentRecord> {
        self.snapshot
            .deployments
            .iter()
            .find(|d| d.name == name && d.namespace == self.namespace)
            .cloned()
            .ok_or_else(|| {
                TopologyError::fetch(
                    "deployment",
                    format!("{}/{name}", self.namespace),
                    "not found",
                )
            })
    }

    fn get_node(&self, name: &str) -> FetchResult<NodeRecord> {
        self.snapshot
            .nodes
            .iter()
            .find(|n| n.name == name)
            .cloned()
            .ok_or_else(|| TopologyError::fetch("node", name, "not found"))
    }

    fn list_nodes(&self, selector: &LabelSelector) -> FetchResult<Vec<NodeRecord>> {
        Ok(self
            .snapshot
            .nodes
            .iter()
            .filter(|n| selector.matches(&n.labels))
            .cloned()
            .collect())
    }

    fn list_communities(&self) -> FetchResult<Vec<Community>> {
        Ok(self.snapshot.communities.clone())
    }

    fn list_clusters(&self) -> FetchResult<Vec<ClusterRecord>> {
        Ok(self.snapshot.clusters.clone())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::store;
    use super::*;

    #[test]
    fn deployments_are_namespaced() {
        let store = store();
        assert!(store.get_deployment("fabedge-operator").is_ok());

        let other = SnapshotStore::new("kube-system", store.snapshot.clone());
        let err = other.get_deployment("fabedge-operator").expect_err("should be missing");
        assert!(matches!(err, TopologyError::ResourceFetch { kind: "deployment", .. }));
    }

    #[test]
    fn missing_node_is_fetch_error() {
        let err = store().get_node("ghost").expect_err("should be missing");
        assert_eq!(err.to_string(), "failed to fetch node ghost: not found");
    }

    #[test]
    fn list_nodes_filters_by_selector() {
        let selector = LabelSelector::parse("node-role.kubernetes.io/edge").expect("selector");
        let nodes = store().list_nodes(&selector).expect("list");
        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["edge-1", "edge-2"]);

        let all = store().list_nodes(&LabelSelector::default()).expect("list");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn snapshot_round_trips_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, serde_json::to_vec(&super::fixtures::beijing()).expect("json"))
            .expect("write");

        let loaded = SnapshotStore::load("fabedge", &path).expect("load");
        assert!(loaded.get_deployment("fabedge-operator").is_ok());
        assert_eq!(loaded.list_clusters().expect("clusters").len(), 2);
    }

    #[test]
    fn unreadable_snapshot_is_config_error() {
        let err = SnapshotStore::load("fabedge", Path::new("/nonexistent/snapshot.json"))
            .expect_err("should fail");
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn malformed_snapshot_is_snapshot_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"{ not json").expect("write");

        let err = SnapshotStore::load("fabedge", &path).expect_err("should fail");
        assert!(matches!(err, CliError::Snapshot(_)));
    }
}
