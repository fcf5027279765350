// ── Host domain type ──

use serde::{Deserialize, Serialize};

use super::endpoint::{Endpoint, Protocol};

/// Version placeholder for a host no pass has versioned yet.
pub const UNKNOWN_VERSION: &str = "-";

/// One storage-service instance at a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Host {
    pub hostname: String,
    /// Product version, or [`UNKNOWN_VERSION`].
    pub version: String,
    pub webdav: Option<Endpoint>,
    pub srm: Option<Endpoint>,
    /// Found by a GLUE 2.0 pass.
    pub discovered_via_glue2: bool,
    /// Found by the GLUE 1.3 pass.
    pub discovered_via_glue1: bool,
}

impl Host {
    pub fn new(hostname: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            version: version.into(),
            webdav: None,
            srm: None,
            discovered_via_glue2: false,
            discovered_via_glue1: false,
        }
    }

    pub fn has_version(&self) -> bool {
        self.version != UNKNOWN_VERSION
    }

    pub fn endpoint(&self, protocol: Protocol) -> Option<&Endpoint> {
        match protocol {
            Protocol::Webdav => self.webdav.as_ref(),
            Protocol::Srm => self.srm.as_ref(),
        }
    }

    /// Attach an endpoint, replacing any earlier one for the same protocol.
    /// Returns the replaced endpoint.
    pub fn set_endpoint(&mut self, endpoint: Endpoint) -> Option<Endpoint> {
        let slot = match endpoint.protocol() {
            Protocol::Webdav => &mut self.webdav,
            Protocol::Srm => &mut self.srm,
        };
        slot.replace(endpoint)
    }

    /// Short tag for which schema generations reported this host.
    pub fn schemas(&self) -> &'static str {
        match (self.discovered_via_glue2, self.discovered_via_glue1) {
            (true, true) => "glue2+glue1",
            (true, false) => "glue2",
            (false, true) => "glue1",
            (false, false) => "-",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_host_is_unversioned_and_bare() {
        let host = Host::new("se.example.org", UNKNOWN_VERSION);
        assert!(!host.has_version());
        assert!(host.webdav.is_none() && host.srm.is_none());
        assert_eq!(host.schemas(), "-");
    }

    #[test]
    fn set_endpoint_last_write_wins() {
        let mut host = Host::new("se.example.org", "1.11.8");
        let first = Endpoint::new(Protocol::Webdav, "https://se.example.org:8443/", "1.0");
        let second = Endpoint::new(Protocol::Webdav, "https://se.example.org:9443/", "2.0");

        assert!(host.set_endpoint(first.clone()).is_none());
        assert_eq!(host.set_endpoint(second.clone()), Some(first));
        assert_eq!(host.endpoint(Protocol::Webdav), Some(&second));
        assert!(host.endpoint(Protocol::Srm).is_none());
    }

    #[test]
    fn protocols_occupy_separate_slots() {
        let mut host = Host::new("se.example.org", "1.11.8");
        let srm_url = "httpg://se.example.org:8444/srm/managerv2";
        host.set_endpoint(Endpoint::new(Protocol::Srm, srm_url, "2.2"));
        host.set_endpoint(Endpoint::new(
            Protocol::Webdav,
            "https://se.example.org:8443/",
            "1.0",
        ));
        assert_eq!(host.srm.as_ref().unwrap().url(), srm_url);
        assert_eq!(
            host.webdav.as_ref().unwrap().url(),
            "https://se.example.org:8443/"
        );
    }
}
