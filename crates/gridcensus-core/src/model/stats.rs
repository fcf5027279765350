// ── Run statistics ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Counters tallied by the merge engine as it discovers sites, hosts
/// and versions. Never decremented; one instance per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    num_sites: usize,
    num_hosts: usize,
    versions: BTreeMap<String, usize>,
}

impl Stats {
    pub fn inc_sites(&mut self) {
        self.num_sites += 1;
    }

    pub fn inc_hosts(&mut self) {
        self.num_hosts += 1;
    }

    pub fn inc_version(&mut self, version: &str) {
        *self.versions.entry(version.to_owned()).or_default() += 1;
    }

    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    pub fn num_hosts(&self) -> usize {
        self.num_hosts
    }

    /// Version → occurrence count, sorted by version string.
    pub fn versions(&self) -> &BTreeMap<String, usize> {
        &self.versions
    }

    pub fn version_count(&self, version: &str) -> usize {
        self.versions.get(version).copied().unwrap_or(0)
    }
}
