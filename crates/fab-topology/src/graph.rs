//! Topology graph assembly.
//!
//! Endpoints become graph nodes keyed by name. Edges are undirected and
//! come from two sources:
//!
//! - the local connector fans out to every endpoint of the local cluster;
//! - members of a community are linked pairwise.
//!
//! Both sources routinely propose the same pair, so every link goes through
//! a per-build set of canonical `(min, max)` name pairs. The result never
//! holds a self-loop or more than one edge per unordered pair.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};
use tracing::{debug, info};

use crate::community::CommunityIndex;
use crate::error::{Result, TopologyError};
use crate::types::{Endpoint, EndpointRole};

/// Fill colour of a node, by role and locality.
#[must_use]
pub const fn fill_color(role: EndpointRole, external: bool) -> &'static str {
    match (role, external) {
        (EndpointRole::Connector, false) => "forestgreen",
        (EndpointRole::Connector, true) => "#9acae1",
        (EndpointRole::EdgeNode, false) => "darkseagreen3",
        (EndpointRole::EdgeNode, true) => "#deebf7",
    }
}

/// A graph node and its visual attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Endpoint name.
    pub name: String,
    /// Owning cluster.
    pub cluster: String,
    /// Endpoint role.
    pub role: EndpointRole,
    /// Whether the endpoint belongs to another cluster.
    pub external: bool,
    /// Fill colour.
    pub fill_color: &'static str,
    /// Hover text.
    pub tooltip: String,
}

impl GraphNode {
    fn from_endpoint(endpoint: &Endpoint) -> Self {
        let tooltip = format!(
            "Name: {}\nPodCIDRs: {}\nNode Subnets: {}\nPublic Addresses: {}",
            endpoint.name,
            endpoint.pod_subnets.join(","),
            endpoint.node_subnets.join(","),
            endpoint.public_addresses.join(","),
        );

        Self {
            name: endpoint.name.clone(),
            cluster: endpoint.cluster.clone(),
            role: endpoint.role,
            external: endpoint.external,
            fill_color: fill_color(endpoint.role, endpoint.external),
            tooltip,
        }
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Edge weight. Links carry no data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Link;

impl fmt::Display for Link {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

/// An undirected graph of endpoints.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    graph: UnGraph<GraphNode, Link>,
    index: HashMap<String, NodeIndex>,
}

impl TopologyGraph {
    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Looks up a node by endpoint name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.index.get(name).map(|&idx| &self.graph[idx])
    }

    /// Returns true if an endpoint named `name` is in the graph.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns true if `a` and `b` are linked.
    #[must_use]
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// Node names, sorted.
    #[must_use]
    pub fn node_names(&self) -> BTreeSet<String> {
        self.index.keys().cloned().collect()
    }

    /// Edges as sorted `(min, max)` name pairs.
    #[must_use]
    pub fn edges(&self) -> BTreeSet<(String, String)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| canonical(&self.graph[a].name, &self.graph[b].name))
            .collect()
    }

    /// Sorted names of the endpoints linked to `name`.
    #[must_use]
    pub fn neighbors(&self, name: &str) -> Vec<String> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut names: Vec<String> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].name.clone())
            .collect();
        names.sort();
        names
    }

    pub(crate) fn inner(&self) -> &UnGraph<GraphNode, Link> {
        &self.graph
    }
}

fn canonical(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Builds one [`TopologyGraph`].
///
/// The set of already-linked pairs lives only as long as the builder.
#[derive(Debug)]
pub struct TopologyBuilder {
    local_cluster: String,
    graph: TopologyGraph,
    linked: HashSet<(String, String)>,
}

impl TopologyBuilder {
    /// Starts a build for the cluster under inspection.
    pub fn new(local_cluster: impl Into<String>) -> Self {
        Self {
            local_cluster: local_cluster.into(),
            graph: TopologyGraph::default(),
            linked: HashSet::new(),
        }
    }

    /// Adds a node for `endpoint`.
    ///
    /// A second endpoint with the same name replaces the node's attributes
    /// but keeps its identity and edges.
    pub fn add_endpoint(&mut self, endpoint: &Endpoint) -> Result<()> {
        if endpoint.name.is_empty() {
            return Err(TopologyError::GraphConstruction(format!(
                "endpoint of cluster {} has no name",
                endpoint.cluster
            )));
        }

        let node = GraphNode::from_endpoint(endpoint);
        match self.graph.index.get(&endpoint.name) {
            Some(&idx) => {
                debug!(endpoint = %endpoint.name, "replacing node attributes");
                self.graph.graph[idx] = node;
            }
            None => {
                let idx = self.graph.graph.add_node(node);
                self.graph.index.insert(endpoint.name.clone(), idx);
            }
        }
        Ok(())
    }

    /// Links two endpoints. Returns whether a new edge was created.
    ///
    /// Self-links and already-linked pairs are skipped. Both names must
    /// already be nodes.
    pub fn link(&mut self, a: &str, b: &str) -> Result<bool> {
        if a == b {
            return Ok(false);
        }

        let pair = canonical(a, b);
        if self.linked.contains(&pair) {
            return Ok(false);
        }

        let lookup = |name: &str| {
            self.graph.index.get(name).copied().ok_or_else(|| {
                TopologyError::GraphConstruction(format!("cannot link {a} and {b}: no node named {name}"))
            })
        };
        let (ia, ib) = (lookup(a)?, lookup(b)?);

        self.graph.graph.add_edge(ia, ib, Link);
        self.linked.insert(pair);
        Ok(true)
    }

    /// Links the local connector to every local endpoint.
    pub fn link_connector<'e, I>(&mut self, endpoints: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'e Endpoint>,
    {
        let connector = format!("{}.connector", self.local_cluster);
        let mut created = 0;

        for endpoint in endpoints {
            if endpoint.cluster == self.local_cluster && self.link(&connector, &endpoint.name)? {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Links every pair of community members that are nodes.
    ///
    /// Members without a node are skipped.
    pub fn link_communities(&mut self, communities: &CommunityIndex) -> Result<usize> {
        let mut created = 0;

        for community in communities.iter() {
            for member in &community.members {
                if !self.graph.contains(member) {
                    continue;
                }
                for peer in &community.members {
                    if self.graph.contains(peer) && self.link(member, peer)? {
                        created += 1;
                    }
                }
            }
        }
        Ok(created)
    }

    /// Finishes the build.
    #[must_use]
    pub fn finish(self) -> TopologyGraph {
        self.graph
    }
}

/// Builds the topology of `local_cluster` from endpoints and communities.
///
/// Endpoints are added in name order so node indices, and therefore the
/// rendered output, do not depend on map iteration order.
pub fn build_topology(
    local_cluster: &str,
    endpoints: &HashMap<String, Endpoint>,
    communities: &CommunityIndex,
) -> Result<TopologyGraph> {
    let mut sorted: Vec<&Endpoint> = endpoints.values().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut builder = TopologyBuilder::new(local_cluster);
    for endpoint in &sorted {
        builder.add_endpoint(endpoint)?;
    }

    let fan_out = builder.link_connector(sorted.iter().copied())?;
    let community_links = builder.link_communities(communities)?;

    let graph = builder.finish();
    info!(
        cluster = %local_cluster,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        fan_out,
        community_links,
        "built topology"
    );
    Ok(graph)
}
