// ── Endpoint domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Access protocol exposed by a storage host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Protocol {
    Webdav,
    Srm,
}

/// A protocol-specific access point. Immutable: replace, don't edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    protocol: Protocol,
    url: String,
    implementation_version: String,
}

impl Endpoint {
    pub fn new(
        protocol: Protocol,
        url: impl Into<String>,
        implementation_version: impl Into<String>,
    ) -> Self {
        Self {
            protocol,
            url: url.into(),
            implementation_version: implementation_version.into(),
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn implementation_version(&self) -> &str {
        &self.implementation_version
    }
}
