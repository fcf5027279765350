// ── Five-pass reconciliation ──
//
// Each pass folds one batch of directory records into the `Census`.
// Records that cannot be applied are skipped with a `Diagnostic`; only a
// pass whose every record is malformed aborts the run.
//
// Stats are bumped at first-discovery time, so they track the model.
// The legacy pass is the exception: a site first seen in GLUE 1.3 counts
// as a site and a version, but not as a host.

use gridcensus_api::Record;
use serde::Serialize;
use strum::Display;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::census::{Census, insert_site, site_entry};
use crate::error::CoreError;
use crate::glue;
use crate::identity::Identity;
use crate::model::{Endpoint, Host, Protocol, Site, UNKNOWN_VERSION};
use crate::pass::Pass;

/// What a dangling reference failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Dangling {
    Site,
    Host,
}

/// A record- or query-level problem that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    #[error("{pass}: query failed, continuing with no records: {message}")]
    QueryFailure { pass: Pass, message: String },

    #[error("{pass}: skipped '{dn}': {reason}")]
    MalformedIdentity {
        pass: Pass,
        dn: String,
        reason: String,
    },

    #[error("{pass}: {host} at {site} refers to a {missing} no earlier pass discovered")]
    DanglingReference {
        pass: Pass,
        site: String,
        host: String,
        missing: Dangling,
    },

    #[error("{pass}: skipped '{dn}': missing attribute {attribute}")]
    MissingAttribute {
        pass: Pass,
        dn: String,
        attribute: String,
    },
}

impl Diagnostic {
    pub fn pass(&self) -> Pass {
        match self {
            Self::QueryFailure { pass, .. }
            | Self::MalformedIdentity { pass, .. }
            | Self::DanglingReference { pass, .. }
            | Self::MissingAttribute { pass, .. } => *pass,
        }
    }
}

/// Outcome of applying one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub pass: Pass,
    /// Records returned by the directory.
    pub received: usize,
    /// Records that changed (or confirmed) the model.
    pub applied: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl PassReport {
    pub fn new(pass: Pass, received: usize) -> Self {
        Self {
            pass,
            received,
            applied: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn skipped(&self) -> usize {
        self.received - self.applied
    }
}

/// Why a record with a valid identity was not applied.
enum Skip {
    Dangling(Dangling),
    MissingAttribute(&'static str),
}

impl Census {
    /// Reconcile one pass worth of records into the census.
    pub fn apply(&mut self, pass: Pass, records: &[Record]) -> Result<PassReport, CoreError> {
        let rule = pass.identity_rule();
        let mut report = PassReport::new(pass, records.len());
        let mut malformed = 0usize;

        for record in records {
            let identity = match rule.parse(record) {
                Ok(identity) => identity,
                Err(CoreError::MalformedIdentity { dn, reason }) => {
                    malformed += 1;
                    let diag = Diagnostic::MalformedIdentity { pass, dn, reason };
                    warn!("{diag}");
                    report.diagnostics.push(diag);
                    continue;
                }
                Err(other) => return Err(other),
            };

            let outcome = match pass {
                Pass::Discovery => {
                    self.discover(&identity);
                    Ok(())
                }
                Pass::Version => self.apply_version(&identity, record),
                Pass::Webdav => self.attach_endpoint(&identity, record, Protocol::Webdav),
                Pass::Srm => self.attach_endpoint(&identity, record, Protocol::Srm),
                Pass::Legacy => self.merge_legacy(&identity, record),
            };

            match outcome {
                Ok(()) => report.applied += 1,
                Err(skip) => {
                    let diag = match skip {
                        Skip::Dangling(missing) => Diagnostic::DanglingReference {
                            pass,
                            site: identity.site,
                            host: identity.host,
                            missing,
                        },
                        Skip::MissingAttribute(attribute) => Diagnostic::MissingAttribute {
                            pass,
                            dn: record.dn.clone(),
                            attribute: attribute.to_owned(),
                        },
                    };
                    warn!("{diag}");
                    report.diagnostics.push(diag);
                }
            }
        }

        if !records.is_empty() && malformed == records.len() {
            return Err(CoreError::PassRejected { pass, malformed });
        }

        info!(
            %pass,
            received = report.received,
            applied = report.applied,
            skipped = report.skipped(),
            "pass applied"
        );
        Ok(report)
    }

    // ── Pass 1: GLUE 2.0 discovery ───────────────────────────────────

    fn discover(&mut self, identity: &Identity) {
        let (site, created) = site_entry(&mut self.sites, &identity.site);
        if created {
            self.stats.inc_sites();
        }
        if site.find_host(&identity.host).is_some() {
            return;
        }
        let mut host = Host::new(identity.host.clone(), UNKNOWN_VERSION);
        host.discovered_via_glue2 = true;
        if site.add_host(host).is_ok() {
            self.stats.inc_hosts();
        }
    }

    // ── Pass 2: GLUE 2.0 version ─────────────────────────────────────

    fn apply_version(&mut self, identity: &Identity, record: &Record) -> Result<(), Skip> {
        let host = locate_mut(&mut self.sites, identity)?;
        let version = record
            .first(glue::GLUE2_MANAGER_PRODUCT_VERSION)
            .ok_or(Skip::MissingAttribute(glue::GLUE2_MANAGER_PRODUCT_VERSION))?;
        version.clone_into(&mut host.version);
        self.stats.inc_version(version);
        Ok(())
    }

    // ── Passes 3 & 4: GLUE 2.0 endpoints ─────────────────────────────

    fn attach_endpoint(
        &mut self,
        identity: &Identity,
        record: &Record,
        protocol: Protocol,
    ) -> Result<(), Skip> {
        let host = locate_mut(&mut self.sites, identity)?;
        let url = record
            .first(glue::GLUE2_ENDPOINT_URL)
            .ok_or(Skip::MissingAttribute(glue::GLUE2_ENDPOINT_URL))?;
        let version = record
            .first(glue::GLUE2_ENDPOINT_IMPLEMENTATION_VERSION)
            .unwrap_or(UNKNOWN_VERSION);

        if let Some(previous) = host.set_endpoint(Endpoint::new(protocol, url, version)) {
            debug!(
                host = %host.hostname,
                %protocol,
                previous = previous.url(),
                "endpoint replaced"
            );
        }
        Ok(())
    }

    // ── Pass 5: GLUE 1.3 discovery + merge ───────────────────────────

    fn merge_legacy(&mut self, identity: &Identity, record: &Record) -> Result<(), Skip> {
        let version = || {
            record
                .first(glue::GLUE1_SERVICE_VERSION)
                .ok_or(Skip::MissingAttribute(glue::GLUE1_SERVICE_VERSION))
        };

        let Some(pos) = self.sites.iter().position(|s| s.id() == identity.site) else {
            // Site only in the legacy tree.
            let version = version()?;
            let mut site = Site::new(&identity.site);
            let mut host = Host::new(identity.host.clone(), version);
            host.discovered_via_glue1 = true;
            if site.add_host(host).is_ok() {
                insert_site(&mut self.sites, site);
                self.stats.inc_sites();
                self.stats.inc_version(version);
            }
            return Ok(());
        };

        let site = &mut self.sites[pos];
        if let Some(host) = site.find_host_mut(&identity.host) {
            // Known from GLUE 2.0: keep its version and counts.
            host.discovered_via_glue1 = true;
            return Ok(());
        }

        let version = version()?;
        let mut host = Host::new(identity.host.clone(), version);
        host.discovered_via_glue1 = true;
        if site.add_host(host).is_ok() {
            self.stats.inc_hosts();
            self.stats.inc_version(version);
        }
        Ok(())
    }
}

fn locate_mut<'a>(sites: &'a mut [Site], identity: &Identity) -> Result<&'a mut Host, Skip> {
    sites
        .iter_mut()
        .find(|s| s.id() == identity.site)
        .ok_or(Skip::Dangling(Dangling::Site))?
        .find_host_mut(&identity.host)
        .ok_or(Skip::Dangling(Dangling::Host))
}
