// ── Collector ──
//
// Drives the five passes against a `Directory`, one query at a time and
// in `Pass::ORDER`. A query that fails is logged, contributes zero
// records, and the run moves on to the next pass.

use chrono::{DateTime, Utc};
use gridcensus_api::{Directory, Record};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::census::Census;
use crate::error::CoreError;
use crate::merge::{Diagnostic, PassReport};
use crate::pass::Pass;

/// A finished run: the census plus what each pass did.
#[derive(Debug, Clone, Serialize)]
pub struct CensusReport {
    /// Where the records came from (URL or snapshot path).
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub census: Census,
    pub passes: Vec<PassReport>,
}

impl CensusReport {
    /// Every diagnostic across all passes, in pass order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.passes.iter().flat_map(|p| p.diagnostics.iter())
    }

    pub fn has_query_failures(&self) -> bool {
        self.diagnostics()
            .any(|d| matches!(d, Diagnostic::QueryFailure { .. }))
    }
}

pub struct Collector<D> {
    directory: D,
}

impl<D: Directory> Collector<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Run every pass and return the resulting census.
    pub async fn run(&mut self) -> Result<CensusReport, CoreError> {
        let source = self.directory.source();
        info!(%source, "starting census");

        let mut census = Census::new();
        let mut passes = Vec::with_capacity(Pass::ORDER.len());
        for pass in Pass::ORDER {
            passes.push(self.run_pass(&mut census, pass).await?);
        }

        info!(
            sites = census.stats().num_sites(),
            hosts = census.stats().num_hosts(),
            "census complete"
        );
        Ok(CensusReport {
            source,
            generated_at: Utc::now(),
            census,
            passes,
        })
    }

    async fn run_pass(&mut self, census: &mut Census, pass: Pass) -> Result<PassReport, CoreError> {
        let query = pass.query();
        debug!(%pass, schema = %query.schema, filter = %query.filter, "querying directory");

        let (records, failure): (Vec<Record>, _) = match self.directory.search(&query).await {
            Ok(records) => (records, None),
            Err(e) => {
                let diag = Diagnostic::QueryFailure {
                    pass,
                    message: e.to_string(),
                };
                warn!("{diag}");
                (Vec::new(), Some(diag))
            }
        };

        let mut report = census.apply(pass, &records)?;
        if let Some(diag) = failure {
            report.diagnostics.insert(0, diag);
        }
        Ok(report)
    }

    /// Give back the directory (e.g. to pull a recorded snapshot out).
    pub fn into_directory(self) -> D {
        self.directory
    }
}
