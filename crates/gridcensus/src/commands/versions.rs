//! Version histogram.

use serde::Serialize;
use tabled::Tabled;

use gridcensus_core::CensusReport;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize, Tabled)]
struct VersionRow {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Deployments")]
    deployments: usize,
}

fn rows(report: &CensusReport) -> Vec<VersionRow> {
    report
        .census
        .stats()
        .versions()
        .iter()
        .map(|(version, &deployments)| VersionRow {
            version: version.clone(),
            deployments,
        })
        .collect()
}

pub fn handle(report: &CensusReport, global: &GlobalOpts) -> Result<(), CliError> {
    let rows = rows(report);
    let out = output::render_list(
        &global.output,
        &rows,
        |r| VersionRow {
            version: r.version.clone(),
            deployments: r.deployments,
        },
        |r| format!("{}\t{}", r.version, r.deployments),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
