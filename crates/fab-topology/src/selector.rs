//! Equality-based label queries (`k=v`, `k==v`, `k!=v`, `k`).

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, TopologyError};

/// One requirement of a label selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Label must equal the value.
    Equals(String, String),
    /// Label must be absent or differ from the value.
    NotEquals(String, String),
    /// Label must be present.
    Exists(String),
}

impl Requirement {
    fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self {
            Self::Equals(key, value) => labels.get(key) == Some(value),
            Self::NotEquals(key, value) => labels.get(key) != Some(value),
            Self::Exists(key) => labels.contains_key(key),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(k, v) => write!(f, "{k}={v}"),
            Self::NotEquals(k, v) => write!(f, "{k}!={v}"),
            Self::Exists(k) => write!(f, "{k}"),
        }
    }
}

/// A conjunction of label requirements. The empty selector matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Vec<Requirement>,
}

impl LabelSelector {
    /// Parses a comma-separated label query.
    pub fn parse(selector: &str) -> Result<Self> {
        let invalid = |reason: &str| TopologyError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        };

        let mut requirements = Vec::new();
        for token in selector.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let requirement = if let Some((key, value)) = token.split_once("!=") {
                Requirement::NotEquals(key.trim().to_string(), value.trim().to_string())
            } else if let Some((key, value)) = token.split_once("==") {
                Requirement::Equals(key.trim().to_string(), value.trim().to_string())
            } else if let Some((key, value)) = token.split_once('=') {
                Requirement::Equals(key.trim().to_string(), value.trim().to_string())
            } else {
                Requirement::Exists(token.to_string())
            };

            let key = match &requirement {
                Requirement::Equals(k, _) | Requirement::NotEquals(k, _) | Requirement::Exists(k) => k,
            };
            if key.is_empty() {
                return Err(invalid("empty label key"));
            }
            requirements.push(requirement);
        }

        Ok(Self { requirements })
    }

    /// Selector requiring every `key=value` pair, or key presence for empty values.
    #[must_use]
    pub fn from_labels(labels: &BTreeMap<String, String>) -> Self {
        let requirements = labels
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    Requirement::Exists(k.clone())
                } else {
                    Requirement::Equals(k.clone(), v.clone())
                }
            })
            .collect();
        Self { requirements }
    }

    /// Returns true if `labels` satisfy every requirement.
    #[must_use]
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.requirements.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test_case("", true ; "empty matches all")]
    #[test_case("zone=a", true ; "single equals")]
    #[test_case("zone==a", true ; "double equals")]
    #[test_case("zone!=b", true ; "not equals")]
    #[test_case("zone!=a", false ; "not equals mismatch")]
    #[test_case("edge", true ; "exists")]
    #[test_case("gpu", false ; "missing key")]
    #[test_case("zone=a,edge,tier!=db", true ; "conjunction")]
    #[test_case("zone=a,tier=web", false ; "conjunction mismatch")]
    fn selector_matching(selector: &str, expected: bool) {
        let node = labels(&[("zone", "a"), ("edge", "")]);
        let selector = LabelSelector::parse(selector).expect("should parse");
        assert_eq!(selector.matches(&node), expected);
    }

    #[test_case("=a" ; "missing key")]
    #[test_case("!=a" ; "missing key before not equals")]
    fn rejects_malformed(input: &str) {
        let err = LabelSelector::parse(input).expect_err("should fail");
        assert!(matches!(err, TopologyError::InvalidSelector { .. }));
    }

    #[test]
    fn from_labels_treats_empty_value_as_exists() {
        let selector = LabelSelector::from_labels(&labels(&[("edge", ""), ("zone", "a")]));
        assert_eq!(selector.to_string(), "edge,zone=a");
        assert!(selector.matches(&labels(&[("edge", "true"), ("zone", "a")])));
        assert!(!selector.matches(&labels(&[("zone", "a")])));
    }
}
