// ── Recorded directory answers ──
//
// A snapshot is the set of (schema, filter) → records answers captured
// from a live directory. `RecordingDirectory` produces one as a side
// effect of a normal run; `SnapshotDirectory` replays it offline.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::directory::Directory;
use crate::error::Error;
use crate::record::{Query, Record, Schema};

/// Answer to one recorded query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedQuery {
    pub schema: Schema,
    pub filter: String,
    #[serde(default)]
    pub records: Vec<Record>,
}

/// On-disk snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub captured_at: Option<DateTime<Utc>>,
    /// Where the answers came from (directory URL).
    pub source: Option<String>,
    #[serde(default)]
    pub queries: Vec<RecordedQuery>,
}

impl Snapshot {
    /// Read a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| Error::InvalidSnapshot {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Write the snapshot as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Look up the answer recorded for `schema` + `filter`.
    pub fn find(&self, schema: Schema, filter: &str) -> Option<&RecordedQuery> {
        self.queries
            .iter()
            .find(|q| q.schema == schema && q.filter == filter)
    }

    /// Record an answer, replacing any earlier one for the same query.
    pub fn insert(&mut self, schema: Schema, filter: &str, records: Vec<Record>) {
        if let Some(existing) = self
            .queries
            .iter_mut()
            .find(|q| q.schema == schema && q.filter == filter)
        {
            existing.records = records;
        } else {
            self.queries.push(RecordedQuery {
                schema,
                filter: filter.to_owned(),
                records,
            });
        }
    }
}

// ── Replay ──────────────────────────────────────────────────────────

/// Serves queries from a previously captured snapshot.
pub struct SnapshotDirectory {
    label: String,
    snapshot: Snapshot,
}

impl SnapshotDirectory {
    /// Load the snapshot at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let snapshot = Snapshot::load(&path)?;
        debug!(
            path = %path.display(),
            queries = snapshot.queries.len(),
            "loaded directory snapshot"
        );
        Ok(Self {
            label: path.display().to_string(),
            snapshot,
        })
    }

    /// Serve an in-memory snapshot.
    pub fn from_snapshot(snapshot: Snapshot, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            snapshot,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

impl Directory for SnapshotDirectory {
    async fn search(&mut self, query: &Query) -> Result<Vec<Record>, Error> {
        self.snapshot
            .find(query.schema, &query.filter)
            .map(|q| q.records.clone())
            .ok_or_else(|| Error::NotRecorded {
                schema: query.schema,
                filter: query.filter.clone(),
            })
    }

    fn source(&self) -> String {
        self.snapshot
            .source
            .as_ref()
            .map_or_else(|| self.label.clone(), |s| format!("{s} (via {})", self.label))
    }
}

// ── Capture ─────────────────────────────────────────────────────────

/// Pass-through directory that keeps a copy of every successful answer.
pub struct RecordingDirectory<D> {
    inner: D,
    snapshot: Snapshot,
}

impl<D: Directory> RecordingDirectory<D> {
    pub fn new(inner: D) -> Self {
        let snapshot = Snapshot {
            captured_at: Some(Utc::now()),
            source: Some(inner.source()),
            queries: Vec::new(),
        };
        Self { inner, snapshot }
    }

    /// Everything recorded so far.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Split into the wrapped directory and the recorded snapshot.
    pub fn into_parts(self) -> (D, Snapshot) {
        (self.inner, self.snapshot)
    }
}

impl<D: Directory> Directory for RecordingDirectory<D> {
    async fn search(&mut self, query: &Query) -> Result<Vec<Record>, Error> {
        let records = self.inner.search(query).await?;
        self.snapshot
            .insert(query.schema, &query.filter, records.clone());
        Ok(records)
    }

    fn source(&self) -> String {
        self.inner.source()
    }
}
