//! Affinity configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maps an affinity key to its preferred worker hosts, most preferred first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffinityConfig {
    #[serde(default)]
    affinity: BTreeMap<String, Vec<String>>,
}

impl AffinityConfig {
    pub fn new(affinity: BTreeMap<String, Vec<String>>) -> Self {
        Self { affinity }
    }

    /// Add or replace the preferred hosts for a key.
    #[must_use]
    pub fn with_affinity<I, S>(mut self, key: impl Into<String>, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affinity
            .insert(key.into(), hosts.into_iter().map(Into::into).collect());
        self
    }

    /// Preferred hosts for a key, in preference order.
    pub fn preferred_hosts(&self, key: &str) -> Option<&[String]> {
        self.affinity.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.affinity.is_empty()
    }

    pub fn affinity(&self) -> &BTreeMap<String, Vec<String>> {
        &self.affinity
    }
}
