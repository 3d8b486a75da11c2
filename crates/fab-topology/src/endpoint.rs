//! Endpoint construction for local nodes and remote cluster records.

use std::collections::HashMap;

use ipnet::IpNet;
use tracing::{debug, warn};

use crate::cni::split_list;
use crate::config::{ClusterConfig, NODE_PLACEHOLDER};
use crate::types::{ClusterRecord, Endpoint, EndpointRecord, EndpointRole, NodeRecord};

/// Annotation overriding a node's public addresses.
pub const PUBLIC_ADDRESSES_ANNOTATION: &str = "fabedge.io/node-public-addresses";

/// Annotation overriding a node's subnets.
pub const NODE_SUBNETS_ANNOTATION: &str = "fabedge.io/node-subnets";

/// Builds endpoints for one cluster under inspection.
#[derive(Debug, Clone)]
pub struct EndpointFactory<'a> {
    config: &'a ClusterConfig,
}

impl<'a> EndpointFactory<'a> {
    /// Creates a factory bound to `config`.
    #[must_use]
    pub const fn new(config: &'a ClusterConfig) -> Self {
        Self { config }
    }

    /// Endpoint name of a local node: `{cluster}.{node}`.
    #[must_use]
    pub fn endpoint_name(&self, node_name: &str) -> String {
        format!("{}.{node_name}", self.config.name)
    }

    /// Builds the endpoint of a locally discovered edge node.
    #[must_use]
    pub fn build(&self, node: &NodeRecord) -> Endpoint {
        let name = self.endpoint_name(&node.name);
        let id = self.config.endpoint_id_format.replace(NODE_PLACEHOLDER, &name);

        Endpoint {
            id,
            name,
            cluster: self.config.name.clone(),
            role: EndpointRole::EdgeNode,
            external: false,
            public_addresses: public_addresses(node),
            node_subnets: node_subnets(node),
            pod_subnets: self.config.strategy.pod_subnets(node),
        }
    }

    /// Builds the local connector from the operator's connector arguments.
    #[must_use]
    pub fn connector(&self) -> Endpoint {
        let name = self.config.connector_name();
        let id = self.config.endpoint_id_format.replace(NODE_PLACEHOLDER, &name);

        Endpoint {
            id,
            name,
            cluster: self.config.name.clone(),
            role: EndpointRole::Connector,
            external: false,
            public_addresses: self.config.connector_public_addresses.clone(),
            node_subnets: Vec::new(),
            pod_subnets: self.config.connector_subnets.clone(),
        }
    }

    /// Materializes an endpoint advertised by a cluster record.
    #[must_use]
    pub fn from_record(&self, cluster: &str, record: &EndpointRecord) -> Endpoint {
        Endpoint {
            id: record.id.clone(),
            name: record.name.clone(),
            cluster: cluster.to_string(),
            role: record.role,
            external: cluster != self.config.name,
            public_addresses: record.public_addresses.clone(),
            node_subnets: record.node_subnets.clone(),
            pod_subnets: record.subnets.clone(),
        }
    }

    /// Assembles the name-keyed endpoint map for a topology build.
    ///
    /// Cluster records are applied first and local nodes second, so a local
    /// node replaces a record of the same name. The local connector is built
    /// from the operator arguments unless a cluster record advertises it.
    #[must_use]
    pub fn collect(&self, clusters: &[ClusterRecord], nodes: &[NodeRecord]) -> HashMap<String, Endpoint> {
        let mut endpoints = HashMap::new();

        let remote = clusters
            .iter()
            .flat_map(|c| c.endpoints.iter().map(move |r| self.from_record(&c.name, r)));
        for endpoint in remote {
            insert_endpoint(&mut endpoints, endpoint);
        }

        let connector = self.connector();
        if !endpoints.contains_key(&connector.name) {
            debug!(endpoint = %connector.name, "no cluster record for local connector, using operator arguments");
            endpoints.insert(connector.name.clone(), connector);
        }

        for endpoint in nodes.iter().map(|n| self.build(n)) {
            insert_endpoint(&mut endpoints, endpoint);
        }

        debug!(count = endpoints.len(), "collected endpoints");
        endpoints
    }
}

fn insert_endpoint(endpoints: &mut HashMap<String, Endpoint>, endpoint: Endpoint) {
    if let Some(previous) = endpoints.insert(endpoint.name.clone(), endpoint) {
        warn!(
            endpoint = %previous.name,
            cluster = %previous.cluster,
            "endpoint name collision, keeping the later record"
        );
    }
}

fn public_addresses(node: &NodeRecord) -> Vec<String> {
    if let Some(value) = node.annotations.get(PUBLIC_ADDRESSES_ANNOTATION) {
        return split_list(value);
    }
    node.internal_ips().iter().map(ToString::to_string).collect()
}

fn node_subnets(node: &NodeRecord) -> Vec<String> {
    if let Some(value) = node.annotations.get(NODE_SUBNETS_ANNOTATION) {
        return split_list(value);
    }
    node.internal_ips()
        .into_iter()
        .map(|ip| IpNet::from(ip).to_string())
        .collect()
}
