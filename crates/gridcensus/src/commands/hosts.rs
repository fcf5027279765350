//! Host listing.

use serde::Serialize;
use tabled::Tabled;

use gridcensus_core::{CensusReport, Host, Protocol, Site};

use crate::cli::{GlobalOpts, HostsArgs, SchemaFilter};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "WebDAV")]
    webdav: String,
    #[tabled(rename = "SRM")]
    srm: String,
    #[tabled(rename = "Schemas")]
    schemas: &'static str,
}

/// Serialized shape: the host plus its owning site.
#[derive(Serialize)]
struct HostView<'a> {
    site: &'a str,
    #[serde(flatten)]
    host: &'a Host,
}

impl From<&HostView<'_>> for HostRow {
    fn from(v: &HostView<'_>) -> Self {
        let url = |p| v.host.endpoint(p).map(|e| e.url().to_owned()).unwrap_or_default();
        Self {
            site: v.site.to_owned(),
            host: v.host.hostname.clone(),
            version: v.host.version.clone(),
            webdav: url(Protocol::Webdav),
            srm: url(Protocol::Srm),
            schemas: v.host.schemas(),
        }
    }
}

// ── Filtering ───────────────────────────────────────────────────────

fn matches(host: &Host, args: &HostsArgs) -> bool {
    if let Some(ref version) = args.version {
        if &host.version != version {
            return false;
        }
    }
    match args.schema {
        Some(SchemaFilter::Glue2) => host.discovered_via_glue2,
        Some(SchemaFilter::Glue1) => host.discovered_via_glue1,
        Some(SchemaFilter::Both) => host.discovered_via_glue2 && host.discovered_via_glue1,
        None => true,
    }
}

fn select<'a>(report: &'a CensusReport, args: &HostsArgs) -> Result<Vec<HostView<'a>>, CliError> {
    let sites: Vec<&Site> = match args.site {
        Some(ref id) => {
            let site = report
                .census
                .find_site(&id.to_uppercase())
                .ok_or_else(|| CliError::SiteNotFound { site: id.clone() })?;
            vec![site]
        }
        None => report.census.sites().iter().collect(),
    };

    Ok(sites
        .into_iter()
        .flat_map(|site| {
            site.hosts()
                .iter()
                .filter(|h| matches(h, args))
                .map(move |host| HostView {
                    site: site.id(),
                    host,
                })
        })
        .collect())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(report: &CensusReport, args: &HostsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let hosts = select(report, args)?;
    let out = output::render_list(
        &global.output,
        &hosts,
        |v| HostRow::from(v),
        |v| v.host.hostname.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
