//! `report.html`: summary, version histogram, and the host table.

use std::fmt::Write;

use gridcensus_core::{CensusReport, Host, Protocol};

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse;margin-bottom:2em}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\
th{background:#eee}td.num{text-align:right}";

pub fn render(report: &CensusReport) -> String {
    let census = &report.census;
    let stats = census.stats();
    let mut out = String::new();

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>Storage census</title>");
    let _ = writeln!(out, "<style>{STYLE}</style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "<h1>Storage census</h1>");
    let _ = writeln!(
        out,
        "<p>Source: {} &middot; generated {}</p>",
        escape(&report.source),
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    // ── Summary ──
    let _ = writeln!(out, "<h2>Summary</h2>");
    let _ = writeln!(out, "<table>");
    let _ = writeln!(out, "<tr><th>Sites</th><td class=\"num\">{}</td></tr>", stats.num_sites());
    let _ = writeln!(out, "<tr><th>Hosts</th><td class=\"num\">{}</td></tr>", stats.num_hosts());
    let _ = writeln!(
        out,
        "<tr><th>Versions</th><td class=\"num\">{}</td></tr>",
        stats.versions().len()
    );
    let _ = writeln!(out, "</table>");

    // ── Versions ──
    let _ = writeln!(out, "<h2>Versions</h2>");
    let _ = writeln!(out, "<table>");
    let _ = writeln!(out, "<tr><th>Version</th><th>Deployments</th></tr>");
    for (version, count) in stats.versions() {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td class=\"num\">{count}</td></tr>",
            escape(version)
        );
    }
    let _ = writeln!(out, "</table>");

    // ── Hosts ──
    let _ = writeln!(out, "<h2>Hosts</h2>");
    let _ = writeln!(out, "<table>");
    let _ = writeln!(
        out,
        "<tr><th>Site</th><th>Host</th><th>Version</th><th>WebDAV</th><th>SRM</th><th>Schemas</th></tr>"
    );
    for (site, host) in census.hosts() {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(site.id()),
            escape(&host.hostname),
            escape(&host.version),
            endpoint_cell(host, Protocol::Webdav),
            endpoint_cell(host, Protocol::Srm),
            host.schemas(),
        );
    }
    let _ = writeln!(out, "</table>");

    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

fn endpoint_cell(host: &Host, protocol: Protocol) -> String {
    host.endpoint(protocol).map_or_else(String::new, |e| {
        format!(
            "{} ({})",
            escape(e.url()),
            escape(e.implementation_version())
        )
    })
}

fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use gridcensus_core::{Census, Pass, Record, glue};

    use super::*;

    fn report() -> CensusReport {
        let mut census = Census::new();
        let service = Record::new(
            "GLUE2ServiceID=a.example.org/storage,GLUE2GroupID=resource,\
             GLUE2DomainID=Site<X>,GLUE2GroupID=grid,o=glue",
        );
        let manager = Record::new(
            "GLUE2ManagerID=a.example.org/storage/manager,GLUE2ServiceID=a.example.org/storage,\
             GLUE2GroupID=resource,GLUE2DomainID=Site<X>,GLUE2GroupID=grid,o=glue",
        )
        .with_attr(glue::GLUE2_MANAGER_PRODUCT_VERSION, ["1.11.8"]);
        let passes = vec![
            census.apply(Pass::Discovery, &[service]).unwrap(),
            census.apply(Pass::Version, &[manager]).unwrap(),
        ];
        CensusReport {
            source: "ldap://bdii.example.org:2170".into(),
            generated_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap(),
            census,
            passes,
        }
    }

    #[test]
    fn contains_summary_and_rows() {
        let html = render(&report());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<tr><th>Sites</th><td class=\"num\">1</td></tr>"));
        assert!(html.contains("<tr><td>1.11.8</td><td class=\"num\">1</td></tr>"));
        assert!(html.contains("generated 2026-10-18 09:30 UTC"));
        assert!(html.contains("<td>a.example.org</td><td>1.11.8</td>"));
    }

    #[test]
    fn values_are_escaped() {
        let html = render(&report());
        assert!(html.contains("<td>SITE&lt;X&gt;</td>"));
        assert!(!html.contains("SITE<X>"));
    }

    #[test]
    fn escape_covers_markup_chars() {
        assert_eq!(
            escape(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }
}
