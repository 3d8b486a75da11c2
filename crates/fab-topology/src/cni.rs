//! CNI-specific pod subnet discovery.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::NodeRecord;

/// Annotation holding the pod subnets FabEdge assigned to an edge node.
pub const POD_SUBNETS_ANNOTATION: &str = "fabedge.io/subnets";

/// Container networking plugin of a cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CniKind {
    /// Calico: pod subnets are allocated by FabEdge and kept in an annotation.
    Calico,
    /// Flannel: pod subnets come from the node spec.
    Flannel,
    /// Anything else.
    #[default]
    Unknown,
}

impl FromStr for CniKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "calico" => Self::Calico,
            "flannel" => Self::Flannel,
            _ => Self::Unknown,
        })
    }
}

impl fmt::Display for CniKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calico => write!(f, "calico"),
            Self::Flannel => write!(f, "flannel"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Extracts pod subnets from a node record.
///
/// Implementations must be read-only.
pub trait PodSubnetStrategy: fmt::Debug + Send + Sync {
    /// Pod subnets of `node`, in record order.
    fn pod_subnets(&self, node: &NodeRecord) -> Vec<String>;
}

/// Reads the comma-separated [`POD_SUBNETS_ANNOTATION`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationSubnets;

impl PodSubnetStrategy for AnnotationSubnets {
    fn pod_subnets(&self, node: &NodeRecord) -> Vec<String> {
        node.annotations
            .get(POD_SUBNETS_ANNOTATION)
            .map(|v| split_list(v))
            .unwrap_or_default()
    }
}

/// Reads `spec.podCIDRs`, falling back to `spec.podCIDR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecSubnets;

impl PodSubnetStrategy for SpecSubnets {
    fn pod_subnets(&self, node: &NodeRecord) -> Vec<String> {
        node.spec_pod_cidrs()
    }
}

/// Always returns no subnets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSubnets;

impl PodSubnetStrategy for NoSubnets {
    fn pod_subnets(&self, _node: &NodeRecord) -> Vec<String> {
        Vec::new()
    }
}

/// Selects the pod subnet strategy for a CNI kind.
#[must_use]
pub fn strategy_for(kind: CniKind) -> Arc<dyn PodSubnetStrategy> {
    match kind {
        CniKind::Calico => Arc::new(AnnotationSubnets),
        CniKind::Flannel => Arc::new(SpecSubnets),
        CniKind::Unknown => Arc::new(NoSubnets),
    }
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn node() -> NodeRecord {
        let mut node = NodeRecord::new("edge-1");
        node.annotations.insert(
            POD_SUBNETS_ANNOTATION.into(),
            "10.234.1.0/26, 10.234.1.64/26".into(),
        );
        node.pod_cidrs = vec!["10.244.3.0/24".into()];
        node
    }

    #[test_case("calico", CniKind::Calico ; "calico")]
    #[test_case("Flannel", CniKind::Flannel ; "case insensitive")]
    #[test_case("cilium", CniKind::Unknown ; "unrecognized")]
    #[test_case("", CniKind::Unknown ; "empty")]
    fn parses_cni_kind(input: &str, expected: CniKind) {
        assert_eq!(input.parse::<CniKind>(), Ok(expected));
    }

    #[test]
    fn calico_reads_annotation() {
        let subnets = strategy_for(CniKind::Calico).pod_subnets(&node());
        assert_eq!(subnets, vec!["10.234.1.0/26", "10.234.1.64/26"]);
    }

    #[test]
    fn flannel_reads_spec() {
        let subnets = strategy_for(CniKind::Flannel).pod_subnets(&node());
        assert_eq!(subnets, vec!["10.244.3.0/24"]);
    }

    #[test]
    fn unknown_returns_nothing() {
        assert!(strategy_for(CniKind::Unknown).pod_subnets(&node()).is_empty());
    }

    #[test]
    fn calico_without_annotation_is_empty() {
        let subnets = AnnotationSubnets.pod_subnets(&NodeRecord::new("bare"));
        assert!(subnets.is_empty());
    }
}
