//! Cluster configuration extracted from control deployment arguments.
//!
//! FabEdge keeps its cluster-level settings on the command line of the
//! `fabedge-operator` deployment. [`ClusterConfig::resolve`] turns that
//! argument list into a typed value once; nothing downstream looks at raw
//! arguments again.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::args::ArgTable;
use crate::cni::{split_list, strategy_for, CniKind, PodSubnetStrategy};
use crate::error::{Result, TopologyError};
use crate::selector::LabelSelector;
use crate::types::{DeploymentRecord, NodeRecord};

/// Deployment whose arguments carry the cluster configuration.
pub const OPERATOR_DEPLOYMENT: &str = "fabedge-operator";

/// Deployment whose arguments carry region and zone.
pub const SERVICE_HUB_DEPLOYMENT: &str = "service-hub";

/// Endpoint ID template used when the operator does not set one.
pub const DEFAULT_ENDPOINT_ID_FORMAT: &str = "C=CN, O=fabedge.io, CN={node}";

/// Edge node selector used when the operator does not set one.
pub const DEFAULT_EDGE_LABELS: &str = "node-role.kubernetes.io/edge";

/// Placeholder substituted in the endpoint ID template.
pub const NODE_PLACEHOLDER: &str = "{node}";

/// Typed cluster configuration.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Cluster name.
    pub name: String,
    /// CNI in use.
    pub cni: CniKind,
    /// Endpoint ID template containing [`NODE_PLACEHOLDER`].
    pub endpoint_id_format: String,
    /// Edge node selector; an empty value means "key present".
    pub edge_labels: BTreeMap<String, String>,
    /// Pod subnet extraction for `cni`.
    pub strategy: Arc<dyn PodSubnetStrategy>,
    /// Public addresses of the local connector.
    pub connector_public_addresses: Vec<String>,
    /// Subnets routed through the local connector.
    pub connector_subnets: Vec<String>,
}

impl ClusterConfig {
    /// Resolves the configuration from operator arguments.
    pub fn resolve(args: &ArgTable) -> Self {
        let name = args.get("cluster").to_string();
        if name.is_empty() {
            warn!("operator arguments do not name the cluster");
        }

        let cni: CniKind = args.get("cni-type").parse().unwrap_or_default();
        let endpoint_id_format = args
            .get_or_default("endpoint-id-format", DEFAULT_ENDPOINT_ID_FORMAT)
            .to_string();
        let mut edge_labels = parse_labels(args.get_or_default("edge-labels", DEFAULT_EDGE_LABELS));
        if edge_labels.is_empty() {
            warn!(
                value = %args.get("edge-labels"),
                default = DEFAULT_EDGE_LABELS,
                "edge-labels names no label, using the default"
            );
            edge_labels = parse_labels(DEFAULT_EDGE_LABELS);
        }

        debug!(cluster = %name, cni = %cni, labels = ?edge_labels, "resolved cluster config");

        Self {
            name,
            cni,
            endpoint_id_format,
            edge_labels,
            strategy: strategy_for(cni),
            connector_public_addresses: split_list(args.get("connector-public-addresses")),
            connector_subnets: split_list(args.get("connector-subnets")),
        }
    }

    /// Resolves the configuration from the operator deployment record.
    pub fn from_deployment(deployment: &DeploymentRecord) -> Result<Self> {
        Ok(Self::resolve(&container_args(deployment)?))
    }

    /// Name of this cluster's connector endpoint.
    #[must_use]
    pub fn connector_name(&self) -> String {
        format!("{}.connector", self.name)
    }

    /// Selector matching this cluster's edge nodes.
    #[must_use]
    pub fn edge_selector(&self) -> LabelSelector {
        LabelSelector::from_labels(&self.edge_labels)
    }

    /// Returns true if `node` carries every edge label.
    #[must_use]
    pub fn is_edge_node(&self, node: &NodeRecord) -> bool {
        self.edge_selector().matches(&node.labels)
    }
}

/// Parses `k1=v1,k2=v2,k3` into a label map. A bare key maps to `""`.
#[must_use]
pub fn parse_labels(labels: &str) -> BTreeMap<String, String> {
    labels
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (token.to_string(), String::new()),
        })
        .collect()
}

/// Arguments of a deployment's first container.
pub fn container_args(deployment: &DeploymentRecord) -> Result<ArgTable> {
    deployment
        .first_container_args()
        .map(ArgTable::parse)
        .ok_or_else(|| {
            TopologyError::ConfigExtraction(format!(
                "deployment {} has no containers",
                deployment.name
            ))
        })
}

/// Cluster-wide FabEdge settings shown by `cluster-info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    /// Cluster name.
    pub name: String,
    /// Host or member.
    pub role: String,
    /// Region from the service hub.
    pub region: String,
    /// Zone from the service hub.
    pub zone: String,
    /// CNI type as configured.
    pub cni_type: String,
    /// CIDR edge pods are allocated from.
    pub edge_pod_cidr: String,
    /// Connector public addresses.
    pub connector_public_addresses: String,
    /// Subnets routed through the connector.
    pub connector_subnets: String,
}

impl ClusterInfo {
    /// Combines operator and service hub arguments.
    pub fn resolve(operator: &ArgTable, service_hub: &ArgTable) -> Self {
        Self {
            name: operator.get("cluster").to_string(),
            role: operator.get("cluster-role").to_string(),
            region: service_hub.get("region").to_string(),
            zone: service_hub.get("zone").to_string(),
            cni_type: operator.get("cni-type").to_string(),
            edge_pod_cidr: operator.get("edge-pod-cidr").to_string(),
            connector_public_addresses: operator.get("connector-public-addresses").to_string(),
            connector_subnets: operator.get("connector-subnets").to_string(),
        }
    }

    /// Resolves from both deployment records.
    pub fn from_deployments(operator: &DeploymentRecord, service_hub: &DeploymentRecord) -> Result<Self> {
        Ok(Self::resolve(&container_args(operator)?, &container_args(service_hub)?))
    }
}
