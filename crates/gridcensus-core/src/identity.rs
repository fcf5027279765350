// ── Positional identity extraction ──
//
// Directory DNs encode the site/host hierarchy by position, and the two
// GLUE generations place those segments at different depths. Each rule
// carries its own component-index contract.
//
//   GLUE2ServiceID=<host>/storage,GLUE2GroupID=resource,GLUE2DomainID=<site>,...
//   GLUE2ManagerID=...,GLUE2ServiceID=<host>/storage,GLUE2GroupID=resource,GLUE2DomainID=<site>,...
//   GlueServiceUniqueID=...,Mds-Vo-name=<site>,Mds-Vo-name=local,o=grid

use gridcensus_api::Record;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::glue::{GLUE1_SERVICE_ENDPOINT, STORAGE_SUFFIX};

/// (site, host) pair a record refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Upper-cased site identifier.
    pub site: String,
    pub host: String,
}

/// Schema-versioned parsing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityRule {
    /// GLUE 2.0 storage service entry: host at 0, site at 2.
    Glue2Service,
    /// GLUE 2.0 manager entry below the service: host at 1, site at 3.
    Glue2Manager,
    /// GLUE 2.0 endpoint entry below the service: host at 1, site at 3.
    Glue2Endpoint,
    /// GLUE 1.3 service entry: site at 1, host from the endpoint URL.
    Glue1Service,
}

impl IdentityRule {
    fn site_index(self) -> usize {
        match self {
            Self::Glue2Service => 2,
            Self::Glue2Manager | Self::Glue2Endpoint => 3,
            Self::Glue1Service => 1,
        }
    }

    /// Parse the identity of `record`.
    pub fn parse(self, record: &Record) -> Result<Identity, CoreError> {
        let dn = record.dn.as_str();
        let site = component_value(dn, self.site_index())?.to_uppercase();
        let host = match self {
            Self::Glue2Service => strip_storage_suffix(dn, component_value(dn, 0)?)?,
            Self::Glue2Manager | Self::Glue2Endpoint => {
                strip_storage_suffix(dn, component_value(dn, 1)?)?
            }
            Self::Glue1Service => {
                let url = record
                    .first(GLUE1_SERVICE_ENDPOINT)
                    .ok_or_else(|| malformed(dn, format!("missing {GLUE1_SERVICE_ENDPOINT}")))?;
                url_host(dn, url)?
            }
        };
        if site.is_empty() {
            return Err(malformed(dn, "empty site component".into()));
        }
        Ok(Identity {
            site,
            host: host.to_owned(),
        })
    }
}

fn malformed(dn: &str, reason: String) -> CoreError {
    CoreError::MalformedIdentity {
        dn: dn.to_owned(),
        reason,
    }
}

/// Value of the `index`-th `attr=value` component.
fn component_value(dn: &str, index: usize) -> Result<&str, CoreError> {
    let component = dn.split(',').nth(index).ok_or_else(|| {
        malformed(
            dn,
            format!("expected at least {} components", index + 1),
        )
    })?;
    component
        .split_once('=')
        .map(|(_, value)| value.trim())
        .ok_or_else(|| malformed(dn, format!("component {index} has no value")))
}

/// Drop the trailing `/storage` (by length, as published).
fn strip_storage_suffix<'a>(dn: &str, value: &'a str) -> Result<&'a str, CoreError> {
    value
        .len()
        .checked_sub(STORAGE_SUFFIX.len())
        .filter(|&end| end > 0)
        .and_then(|end| value.get(..end))
        .ok_or_else(|| malformed(dn, format!("service id '{value}' too short")))
}

/// Host part of `scheme://host:port/...`: the authority up to the first colon.
fn url_host<'a>(dn: &str, url: &'a str) -> Result<&'a str, CoreError> {
    let (_, rest) = url
        .split_once("://")
        .ok_or_else(|| malformed(dn, format!("'{url}' is not a URL")))?;
    let host = rest.split([':', '/']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(malformed(dn, format!("'{url}' has no host")));
    }
    Ok(host)
}
