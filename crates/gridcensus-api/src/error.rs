use thiserror::Error;

use crate::record::Schema;

/// Top-level error type for the `gridcensus-api` crate.
///
/// Covers every failure mode of the directory surfaces: LDAP transport,
/// binding, URL handling, and snapshot replay. `gridcensus-core` maps these
/// into domain diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// LDAP protocol or connection error (refused, reset, decode failure).
    #[error("LDAP error: {0}")]
    Ldap(#[from] ldap3::LdapError),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The directory URL does not use an LDAP scheme.
    #[error("Unsupported directory scheme '{0}' (expected ldap or ldaps)")]
    UnsupportedScheme(String),

    // ── Authentication ──────────────────────────────────────────────
    /// Simple bind was rejected by the directory.
    #[error("Bind as '{bind_dn}' rejected: {message}")]
    Bind { bind_dn: String, message: String },

    // ── Snapshot ────────────────────────────────────────────────────
    /// A replayed query has no recorded answer.
    #[error("Query not recorded in snapshot ({schema}): {filter}")]
    NotRecorded { schema: Schema, filter: String },

    /// Snapshot file could not be parsed or written.
    #[error("Invalid snapshot {path}: {message}")]
    InvalidSnapshot { path: String, message: String },

    /// Snapshot file I/O.
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if the error came from replaying a snapshot that
    /// lacks the requested query.
    pub fn is_not_recorded(&self) -> bool {
        matches!(self, Self::NotRecorded { .. })
    }

    /// Returns `true` if a connect, bind, or search exceeded its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Ldap(ldap3::LdapError::Timeout { .. }))
    }

    /// Returns `true` if the failure happened before any query could run
    /// (bad URL, wrong scheme, rejected bind).
    pub fn is_connect(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(_) | Self::UnsupportedScheme(_) | Self::Bind { .. }
        )
    }
}
