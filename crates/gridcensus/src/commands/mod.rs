//! Command dispatch: bridges CLI args -> census run -> output formatting.

pub mod config_cmd;
pub mod hosts;
pub mod report;
pub mod sites;
pub mod snapshot;
pub mod summary;
pub mod versions;

use gridcensus_core::{
    CensusReport, Collector, ConnectionSettings, CoreError, Directory, LdapDirectory,
    SnapshotDirectory,
};
use tracing::debug;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch a census-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, report: &CensusReport, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Hosts(args) => hosts::handle(report, &args, global),
        Command::Sites => sites::handle(report, global),
        Command::Versions => versions::handle(report, global),
        Command::Summary => summary::handle(report, global),
        Command::Report(args) => report::handle(report, &args, global),
        // Config, Completions and Snapshot are handled before dispatch
        Command::Config(_) | Command::Completions(_) | Command::Snapshot(_) => unreachable!(),
    }
}

// ── Running a census ────────────────────────────────────────────────

/// Run the five passes against the snapshot or the live directory,
/// whichever the global flags select.
pub async fn collect(global: &GlobalOpts) -> Result<CensusReport, CliError> {
    if let Some(ref path) = global.from_snapshot {
        let directory = open_snapshot(path)?;
        return Ok(Collector::new(directory).run().await?);
    }

    let settings = config::resolve_settings(global)?;
    let directory = connect(&settings).await?;
    let mut collector = Collector::new(directory);
    let report = collector.run().await;
    close(collector.into_directory()).await;
    Ok(report?)
}

pub fn open_snapshot(path: &std::path::Path) -> Result<SnapshotDirectory, CliError> {
    if !path.exists() {
        return Err(CliError::SnapshotNotFound {
            path: path.display().to_string(),
        });
    }
    SnapshotDirectory::open(path).map_err(|e| CoreError::from(e).into())
}

/// Open (and bind) the live directory.
pub async fn connect(settings: &ConnectionSettings) -> Result<LdapDirectory, CliError> {
    LdapDirectory::connect(settings)
        .await
        .map_err(|e| match CoreError::from(e) {
            CoreError::ConnectionFailed { reason, .. } => CliError::ConnectionFailed {
                url: settings.url.to_string(),
                source: reason.into(),
            },
            other => other.into(),
        })
}

/// Unbind; a failure here does not affect the census.
pub async fn close(directory: LdapDirectory) {
    let source = directory.source();
    if let Err(e) = directory.close().await {
        debug!(%source, error = %e, "unbind failed");
    }
}
