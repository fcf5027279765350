//! `gridcensus report`: write the HTML, CSV and site-list files.

use gridcensus_core::CensusReport;

use crate::cli::{GlobalOpts, ReportArgs};
use crate::error::CliError;
use crate::output;

pub fn handle(report: &CensusReport, args: &ReportArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let written = crate::report::write_all(&args.dir, report)?;
    let out = written
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    output::print_output(&out, global.quiet);
    Ok(())
}
