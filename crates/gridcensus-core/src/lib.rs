//! Aggregation core between `gridcensus-api` and report consumers.
//!
//! Builds a census of grid storage deployments from a directory service:
//!
//! - **[`Collector`]**: Runs the five directory passes in order against any
//!   [`Directory`](gridcensus_api::Directory) and returns a [`CensusReport`].
//!   A failed query contributes zero records plus a diagnostic.
//!
//! - **[`Census`]**: The single owned aggregate: sites, their hosts, and the
//!   running [`Stats`]. Each pass is applied with
//!   [`Census::apply`], which reconciles one batch of records and reports
//!   what it skipped.
//!
//! - **Identity rules** ([`identity`]): Positional DN parsing per schema
//!   generation (GLUE 2.0 service / manager / endpoint, GLUE 1.3 service).
//!
//! - **Domain model** ([`model`]): `Site`, `Host`, `Endpoint`, `Stats`.

pub mod census;
pub mod collector;
pub mod error;
pub mod glue;
pub mod identity;
pub mod merge;
pub mod model;
pub mod pass;

// ── Primary re-exports ──────────────────────────────────────────────
pub use census::Census;
pub use collector::{CensusReport, Collector};
pub use error::CoreError;
pub use identity::{Identity, IdentityRule};
pub use merge::{Dangling, Diagnostic, PassReport};
pub use pass::Pass;

pub use model::{Endpoint, Host, Protocol, Site, Stats, UNKNOWN_VERSION};

// Directory surface, so consumers need not depend on the api crate.
pub use gridcensus_api::{
    ConnectionSettings, Directory, LdapDirectory, Query, Record, RecordingDirectory, Schema,
    SimpleBind, Snapshot, SnapshotDirectory,
};
