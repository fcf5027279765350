// ── Site domain type ──

use serde::{Deserialize, Serialize};

use super::host::Host;
use crate::error::CoreError;

/// Administrative domain grouping storage hosts.
///
/// Hosts are kept sorted by hostname so iteration order is stable for
/// reporting. Lookups are linear; a site publishes a handful of hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    id: String,
    hosts: Vec<Host>,
}

impl Site {
    /// Create an empty site. The identifier is upper-cased.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_uppercase(),
            hosts: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn find_host(&self, hostname: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.hostname == hostname)
    }

    pub fn find_host_mut(&mut self, hostname: &str) -> Option<&mut Host> {
        self.hosts.iter_mut().find(|h| h.hostname == hostname)
    }

    /// Insert a host and restore hostname order.
    pub fn add_host(&mut self, host: Host) -> Result<(), CoreError> {
        if self.find_host(&host.hostname).is_some() {
            return Err(CoreError::DuplicateHost {
                site: self.id.clone(),
                host: host.hostname,
            });
        }
        self.hosts.push(host);
        self.hosts.sort_by(|a, b| a.hostname.cmp(&b.hostname));
        Ok(())
    }
}

impl PartialEq for Site {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Site {}
