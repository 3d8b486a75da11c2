//! Records read from the orchestration platform and the endpoint model built from them.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Address type marking a node's cluster-internal IP.
pub const INTERNAL_IP: &str = "InternalIP";

/// A deployment and the containers of its pod template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Deployment name.
    pub name: String,
    /// Namespace the deployment lives in.
    #[serde(default)]
    pub namespace: String,
    /// Pod template containers, in declaration order.
    #[serde(default)]
    pub containers: Vec<ContainerRecord>,
}

impl DeploymentRecord {
    /// Argument list of the first container, if there is one.
    #[must_use]
    pub fn first_container_args(&self) -> Option<&[String]> {
        self.containers.first().map(|c| c.args.as_slice())
    }
}

/// One container of a pod template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    /// Container name.
    pub name: String,
    /// Raw command-line arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

/// A node as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Node name.
    pub name: String,
    /// Node labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Node annotations.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Status addresses.
    #[serde(default)]
    pub addresses: Vec<NodeAddress>,
    /// Legacy single pod CIDR from the node spec.
    #[serde(default)]
    pub pod_cidr: Option<String>,
    /// Pod CIDRs from the node spec.
    #[serde(default, rename = "podCIDRs")]
    pub pod_cidrs: Vec<String>,
}

impl NodeRecord {
    /// Creates a node with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parsed `InternalIP` addresses. Unparseable entries are skipped.
    #[must_use]
    pub fn internal_ips(&self) -> Vec<IpAddr> {
        self.addresses
            .iter()
            .filter(|a| a.kind == INTERNAL_IP)
            .filter_map(|a| match a.address.parse() {
                Ok(ip) => Some(ip),
                Err(_) => {
                    tracing::debug!(node = %self.name, address = %a.address, "skipping unparseable node address");
                    None
                }
            })
            .collect()
    }

    /// Pod CIDRs from the node spec, falling back to the legacy single field.
    #[must_use]
    pub fn spec_pod_cidrs(&self) -> Vec<String> {
        if !self.pod_cidrs.is_empty() {
            return self.pod_cidrs.clone();
        }
        self.pod_cidr.iter().filter(|c| !c.is_empty()).cloned().collect()
    }
}

/// One entry of a node's status addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddress {
    /// Address type, e.g. `InternalIP` or `Hostname`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The address itself.
    pub address: String,
}

impl NodeAddress {
    /// An `InternalIP` address.
    pub fn internal(address: impl Into<String>) -> Self {
        Self {
            kind: INTERNAL_IP.to_string(),
            address: address.into(),
        }
    }
}

/// A named group of mutually reachable endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    /// Community name.
    pub name: String,
    /// Member endpoint names, in record order.
    #[serde(default)]
    pub members: Vec<String>,
}

impl Community {
    /// Creates a community from a name and member list.
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// A cluster record and the endpoints it advertises.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRecord {
    /// Cluster name.
    pub name: String,
    /// Already-resolved endpoints of the cluster.
    #[serde(default)]
    pub endpoints: Vec<EndpointRecord>,
}

/// An endpoint as advertised in a cluster record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    /// Endpoint name.
    pub name: String,
    /// Endpoint ID (certificate subject).
    #[serde(default)]
    pub id: String,
    /// Role of the endpoint.
    #[serde(default, rename = "type")]
    pub role: EndpointRole,
    /// Public addresses.
    #[serde(default)]
    pub public_addresses: Vec<String>,
    /// Pod subnets.
    #[serde(default)]
    pub subnets: Vec<String>,
    /// Node subnets.
    #[serde(default)]
    pub node_subnets: Vec<String>,
}

/// Role of an endpoint in the overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndpointRole {
    /// A physical edge node.
    EdgeNode,
    /// A cluster's gateway.
    #[default]
    Connector,
}

impl std::fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EdgeNode => write!(f, "EdgeNode"),
            Self::Connector => write!(f, "Connector"),
        }
    }
}

/// Identity and network facts for one node or one remote cluster's endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Endpoint ID.
    pub id: String,
    /// Globally unique endpoint name.
    pub name: String,
    /// Owning cluster.
    pub cluster: String,
    /// Role of the endpoint.
    pub role: EndpointRole,
    /// True when the owning cluster is not the one under inspection.
    pub external: bool,
    /// Public addresses.
    pub public_addresses: Vec<String>,
    /// Node subnets.
    pub node_subnets: Vec<String>,
    /// Pod subnets.
    pub pod_subnets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_record_deserializes_from_platform_shape() {
        let json = r#"{
            "name": "edge-1",
            "labels": {"node-role.kubernetes.io/edge": ""},
            "addresses": [
                {"type": "InternalIP", "address": "10.0.0.5"},
                {"type": "Hostname", "address": "edge-1"}
            ],
            "podCIDR": "2.2.0.0/24",
            "podCIDRs": ["2.2.0.0/24", "fd00::/64"]
        }"#;

        let node: NodeRecord = serde_json::from_str(json).expect("should parse");
        assert_eq!(node.name, "edge-1");
        assert_eq!(node.pod_cidrs.len(), 2);
        assert_eq!(node.internal_ips(), vec!["10.0.0.5".parse::<IpAddr>().expect("ip")]);
    }

    #[test]
    fn spec_pod_cidrs_falls_back_to_legacy_field() {
        let mut node = NodeRecord::new("edge-1");
        node.pod_cidr = Some("2.2.0.0/24".into());
        assert_eq!(node.spec_pod_cidrs(), vec!["2.2.0.0/24"]);

        node.pod_cidrs = vec!["2.2.1.0/24".into()];
        assert_eq!(node.spec_pod_cidrs(), vec!["2.2.1.0/24"]);
    }

    #[test]
    fn internal_ips_skips_garbage() {
        let mut node = NodeRecord::new("edge-1");
        node.addresses = vec![NodeAddress::internal("not-an-ip"), NodeAddress::internal("fd00::1")];
        assert_eq!(node.internal_ips().len(), 1);
    }

    #[test]
    fn endpoint_record_role_defaults_to_connector() {
        let json = r#"{"name": "shanghai.connector", "publicAddresses": ["1.2.3.4"]}"#;
        let record: EndpointRecord = serde_json::from_str(json).expect("should parse");
        assert_eq!(record.role, EndpointRole::Connector);
        assert_eq!(record.public_addresses, vec!["1.2.3.4"]);
    }

    #[test]
    fn deployment_first_container_args() {
        let deploy = DeploymentRecord {
            name: "fabedge-operator".into(),
            namespace: "fabedge".into(),
            containers: vec![ContainerRecord {
                name: "operator".into(),
                args: vec!["--cluster=beijing".into()],
            }],
        };
        assert_eq!(deploy.first_container_args(), Some(&["--cluster=beijing".to_string()][..]));
        assert!(DeploymentRecord::default().first_container_args().is_none());
    }
}
