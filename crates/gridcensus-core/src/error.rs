// ── Core error types ──
//
// User-facing errors from gridcensus-core. Consumers never see raw LDAP
// result codes; the `From<gridcensus_api::Error>` impl translates
// transport-layer errors into domain-appropriate variants.
//
// Per-record problems (dangling references, missing attributes, a single
// malformed DN) are not errors: they surface as `Diagnostic`s and the run
// continues.

use thiserror::Error;

use crate::pass::Pass;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to directory at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Directory did not answer in time: {message}")]
    Timeout { message: String },

    #[error("Directory bind failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed identity in '{dn}': {reason}")]
    MalformedIdentity { dn: String, reason: String },

    #[error("Host {host} already present at site {site}")]
    DuplicateHost { site: String, host: String },

    #[error("Every record of the {pass} pass was malformed ({malformed} records)")]
    PassRejected { pass: Pass, malformed: usize },

    // ── Snapshot errors ──────────────────────────────────────────────
    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<gridcensus_api::Error> for CoreError {
    fn from(err: gridcensus_api::Error) -> Self {
        match err {
            e @ gridcensus_api::Error::Ldap(_) if e.is_timeout() => CoreError::Timeout {
                message: e.to_string(),
            },
            gridcensus_api::Error::Ldap(e) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: e.to_string(),
            },
            gridcensus_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            gridcensus_api::Error::UnsupportedScheme(scheme) => CoreError::Config {
                message: format!("Unsupported directory scheme '{scheme}'"),
            },
            gridcensus_api::Error::Bind { bind_dn, message } => CoreError::AuthenticationFailed {
                message: format!("{bind_dn}: {message}"),
            },
            e @ gridcensus_api::Error::NotRecorded { .. } => CoreError::Snapshot {
                message: e.to_string(),
            },
            gridcensus_api::Error::InvalidSnapshot { path, message } => CoreError::Snapshot {
                message: format!("{path}: {message}"),
            },
            gridcensus_api::Error::Io(e) => CoreError::Snapshot {
                message: e.to_string(),
            },
        }
    }
}
