//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use gridcensus_config::ConfigError;
use gridcensus_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to directory at {url}")]
    #[diagnostic(
        code(gridcensus::connection_failed),
        help(
            "Check that the BDII is reachable (usually port 2170).\n\
             URL: {url}\n\
             Try: gridcensus summary --url ldap://<host>:2170"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Directory bind rejected: {message}")]
    #[diagnostic(
        code(gridcensus::auth_failed),
        help(
            "Check bind_dn and the password for profile '{profile}'.\n\
             Public BDIIs are anonymous: remove bind_dn to skip the bind."
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No bind password configured for profile '{profile}'")]
    #[diagnostic(
        code(gridcensus::no_credentials),
        help(
            "Run: gridcensus config init\n\
             Or set password_env on the profile and export that variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Census ───────────────────────────────────────────────────────
    #[error("Directory returned only malformed {pass} records ({count})")]
    #[diagnostic(
        code(gridcensus::pass_rejected),
        help("The directory layout does not match the expected GLUE tree. Run with -vv to see each DN.")
    )]
    PassRejected { pass: String, count: usize },

    #[error("Site '{site}' not found in the census")]
    #[diagnostic(code(gridcensus::not_found), help("Run: gridcensus sites"))]
    SiteNotFound { site: String },

    #[error("{message}")]
    #[diagnostic(code(gridcensus::census))]
    Census { message: String },

    // ── Snapshot ─────────────────────────────────────────────────────
    #[error("Snapshot file not found: {path}")]
    #[diagnostic(
        code(gridcensus::snapshot_not_found),
        help("Record one with: gridcensus snapshot {path}")
    )]
    SnapshotNotFound { path: String },

    #[error("Snapshot error: {message}")]
    #[diagnostic(code(gridcensus::snapshot))]
    Snapshot { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gridcensus::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(gridcensus::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: gridcensus config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(gridcensus::config))]
    Config(Box<ConfigError>),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Directory did not answer in time")]
    #[diagnostic(
        code(gridcensus::timeout),
        help("Increase the timeout with --timeout or check the BDII's load.\n{message}")
    )]
    Timeout { message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(gridcensus::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::AuthFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::SiteNotFound { .. }
            | Self::SnapshotNotFound { .. }
            | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoCredentials { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { message } => CliError::Timeout { message },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::PassRejected { pass, malformed } => CliError::PassRejected {
                pass: pass.to_string(),
                count: malformed,
            },

            CoreError::Snapshot { message } => CliError::Snapshot { message },

            CoreError::Config { message } => CliError::Validation {
                field: "url".into(),
                reason: message,
            },

            e @ (CoreError::MalformedIdentity { .. } | CoreError::DuplicateHost { .. }) => {
                CliError::Census {
                    message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use gridcensus_core::Pass;

    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let timeout: CliError = CoreError::Timeout {
            message: "5s".into(),
        }
        .into();
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let conn: CliError = CoreError::ConnectionFailed {
            url: "ldap://x:2170".into(),
            reason: "refused".into(),
        }
        .into();
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        let rejected: CliError = CoreError::PassRejected {
            pass: Pass::Discovery,
            malformed: 3,
        }
        .into();
        assert_eq!(rejected.exit_code(), exit_code::GENERAL);
        assert_eq!(
            rejected.to_string(),
            "Directory returned only malformed discovery records (3)"
        );

        let missing = CliError::SnapshotNotFound {
            path: "x.json".into(),
        };
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn config_errors_keep_their_kind() {
        let err: CliError = ConfigError::Validation {
            field: "url".into(),
            reason: "bad".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);

        let err: CliError = ConfigError::UnknownProfile {
            name: "lab".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}
