//! `gridcensus snapshot`: run the census and save every directory answer
//! so later runs can replay it with `--from-snapshot`.

use gridcensus_core::{Collector, CoreError, Directory, RecordingDirectory, Snapshot};
use tracing::warn;

use crate::cli::{GlobalOpts, SnapshotArgs};
use crate::commands::{close, connect, open_snapshot};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &SnapshotArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = if let Some(ref path) = global.from_snapshot {
        record(open_snapshot(path)?).await.1?
    } else {
        let settings = config::resolve_settings(global)?;
        let (directory, snapshot) = record(connect(&settings).await?).await;
        close(directory).await;
        snapshot?
    };

    snapshot.save(&args.file).map_err(CoreError::from)?;

    let records: usize = snapshot.queries.iter().map(|q| q.records.len()).sum();
    let out = format!(
        "{}: {} queries, {records} records",
        args.file.display(),
        snapshot.queries.len()
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Run all passes through a recorder and hand back what it captured.
async fn record<D: Directory>(directory: D) -> (D, Result<Snapshot, CliError>) {
    let mut collector = Collector::new(RecordingDirectory::new(directory));
    let report = collector.run().await;
    let (directory, snapshot) = collector.into_directory().into_parts();

    let outcome = report.map_err(CliError::from).map(|report| {
        // Failed queries are not recorded; replaying them fails the same way.
        if report.has_query_failures() {
            warn!("some queries failed; the snapshot is incomplete");
        }
        snapshot
    });
    (directory, outcome)
}
