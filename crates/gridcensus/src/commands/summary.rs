//! Run summary: totals plus what each pass did.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use gridcensus_core::{CensusReport, Diagnostic};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize, Tabled)]
struct PassLine {
    #[tabled(rename = "Pass")]
    pass: String,
    #[tabled(rename = "Received")]
    received: usize,
    #[tabled(rename = "Applied")]
    applied: usize,
    #[tabled(rename = "Skipped")]
    skipped: usize,
}

#[derive(Serialize)]
struct Summary<'a> {
    source: &'a str,
    generated_at: DateTime<Utc>,
    sites: usize,
    /// Hosts counted while merging.
    hosts: usize,
    /// Hosts present in the census.
    hosts_listed: usize,
    versions: &'a BTreeMap<String, usize>,
    passes: Vec<PassLine>,
    diagnostics: Vec<&'a Diagnostic>,
}

impl<'a> From<&'a CensusReport> for Summary<'a> {
    fn from(report: &'a CensusReport) -> Self {
        let stats = report.census.stats();
        Self {
            source: &report.source,
            generated_at: report.generated_at,
            sites: stats.num_sites(),
            hosts: stats.num_hosts(),
            hosts_listed: report.census.host_count(),
            versions: stats.versions(),
            passes: report
                .passes
                .iter()
                .map(|p| PassLine {
                    pass: p.pass.to_string(),
                    received: p.received,
                    applied: p.applied,
                    skipped: p.skipped(),
                })
                .collect(),
            diagnostics: report.diagnostics().collect(),
        }
    }
}

fn detail(s: &Summary<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Source:      {}", s.source);
    let _ = writeln!(out, "Generated:   {}", s.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out, "Sites:       {}", s.sites);
    let _ = writeln!(out, "Hosts:       {} ({} listed)", s.hosts, s.hosts_listed);
    let _ = writeln!(out, "Versions:    {} distinct", s.versions.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", output::render_table(&s.passes));
    if s.diagnostics.is_empty() {
        let _ = write!(out, "No diagnostics.");
    } else {
        let _ = writeln!(out, "Diagnostics ({}):", s.diagnostics.len());
        for diag in &s.diagnostics {
            let _ = writeln!(out, "  - {diag}");
        }
    }
    out.trim_end().to_owned()
}

pub fn handle(report: &CensusReport, global: &GlobalOpts) -> Result<(), CliError> {
    let summary = Summary::from(report);
    let out = output::render_single(&global.output, &summary, detail, |s| {
        format!("sites={} hosts={}", s.sites, s.hosts)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
