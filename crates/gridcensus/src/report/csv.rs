//! `report.csv`: one row per host.

use std::fmt::Write;

use gridcensus_core::{Host, Protocol, Site};

pub const HEADER: &str =
    "site,hostname,version,webdav_url,webdav_version,srm_url,srm_version,glue2,glue1";

pub fn render(sites: &[Site]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    for site in sites {
        for host in site.hosts() {
            let (webdav_url, webdav_version) = endpoint_fields(host, Protocol::Webdav);
            let (srm_url, srm_version) = endpoint_fields(host, Protocol::Srm);
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{},{},{}",
                field(site.id()),
                field(&host.hostname),
                field(&host.version),
                field(webdav_url),
                field(webdav_version),
                field(srm_url),
                field(srm_version),
                host.discovered_via_glue2,
                host.discovered_via_glue1,
            );
        }
    }
    out
}

fn endpoint_fields(host: &Host, protocol: Protocol) -> (&str, &str) {
    host.endpoint(protocol)
        .map_or(("", ""), |e| (e.url(), e.implementation_version()))
}

/// RFC 4180 quoting: only when the value needs it.
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}
