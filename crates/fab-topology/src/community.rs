//! Community membership lookups.

use std::collections::{BTreeSet, HashMap};

use crate::types::Community;

/// Endpoint → communities and community → members.
#[derive(Debug, Clone, Default)]
pub struct CommunityIndex {
    by_endpoint: HashMap<String, Vec<String>>,
    communities: HashMap<String, Community>,
    order: Vec<String>,
}

impl CommunityIndex {
    /// Indexes community records.
    ///
    /// Member names are not checked against known endpoints. A repeated
    /// community name replaces the earlier record in the name lookup.
    #[must_use]
    pub fn load<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Community>,
    {
        let mut index = Self::default();

        for community in records {
            for member in &community.members {
                index
                    .by_endpoint
                    .entry(member.clone())
                    .or_default()
                    .push(community.name.clone());
            }
            let name = community.name.clone();
            if index.communities.insert(name.clone(), community).is_none() {
                index.order.push(name);
            }
        }

        tracing::debug!(
            communities = index.communities.len(),
            endpoints = index.by_endpoint.len(),
            "indexed communities"
        );
        index
    }

    /// Community names `endpoint` belongs to, in discovery order.
    #[must_use]
    pub fn communities_of(&self, endpoint: &str) -> &[String] {
        self.by_endpoint.get(endpoint).map_or(&[], Vec::as_slice)
    }

    /// Looks up a community by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Community> {
        self.communities.get(name)
    }

    /// Communities in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Community> {
        self.order.iter().filter_map(|name| self.communities.get(name))
    }

    /// Number of distinct community names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    /// Returns true if no community was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Sorted members sharing a community with `endpoint`, excluding itself.
    #[must_use]
    pub fn peers_of(&self, endpoint: &str) -> Vec<String> {
        let mut peers: BTreeSet<&str> = self
            .communities_of(endpoint)
            .iter()
            .filter_map(|name| self.communities.get(name))
            .flat_map(|c| c.members.iter().map(String::as_str))
            .collect();
        peers.remove(endpoint);
        peers.into_iter().map(String::from).collect()
    }
}
