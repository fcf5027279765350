//! Site listing.

use std::collections::BTreeSet;

use serde::Serialize;
use tabled::Tabled;

use gridcensus_core::{CensusReport, Site};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Site")]
    id: String,
    #[tabled(rename = "Hosts")]
    hosts: usize,
    #[tabled(rename = "Versions")]
    versions: String,
}

#[derive(Serialize)]
struct SiteView<'a> {
    site: &'a str,
    hosts: usize,
    versions: Vec<&'a str>,
}

impl<'a> From<&'a Site> for SiteView<'a> {
    fn from(site: &'a Site) -> Self {
        let versions: BTreeSet<&str> = site
            .hosts()
            .iter()
            .filter(|h| h.has_version())
            .map(|h| h.version.as_str())
            .collect();
        Self {
            site: site.id(),
            hosts: site.hosts().len(),
            versions: versions.into_iter().collect(),
        }
    }
}

impl From<&SiteView<'_>> for SiteRow {
    fn from(v: &SiteView<'_>) -> Self {
        Self {
            id: v.site.to_owned(),
            hosts: v.hosts,
            versions: v.versions.join(", "),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(report: &CensusReport, global: &GlobalOpts) -> Result<(), CliError> {
    let sites: Vec<SiteView<'_>> = report.census.sites().iter().map(SiteView::from).collect();
    let out = output::render_list(
        &global.output,
        &sites,
        |v| SiteRow::from(v),
        |v| v.site.to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
