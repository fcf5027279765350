//! Report files written by `gridcensus report`.
//!
//! Each renderer is a pure function over the census; `write_all` puts the
//! three files side by side in one directory.

pub mod csv;
pub mod html;
pub mod text;

use std::path::{Path, PathBuf};

use gridcensus_core::CensusReport;
use tracing::info;

use crate::error::CliError;

pub const HTML_FILE: &str = "report.html";
pub const CSV_FILE: &str = "report.csv";
pub const SITES_FILE: &str = "sites.txt";

/// Render every report into `dir`, creating it if needed. Returns the
/// paths written, in a stable order.
pub fn write_all(dir: &Path, report: &CensusReport) -> Result<Vec<PathBuf>, CliError> {
    std::fs::create_dir_all(dir)?;
    let sites = report.census.sites();

    let files = [
        (HTML_FILE, html::render(report)),
        (CSV_FILE, csv::render(sites)),
        (SITES_FILE, text::render(sites)),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = dir.join(name);
        std::fs::write(&path, contents)?;
        info!(path = %path.display(), "report written");
        written.push(path);
    }
    Ok(written)
}
