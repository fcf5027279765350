//! Clap derive structures for the `gridcensus` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Also
//! compiled by build.rs for man pages, so it depends on clap only.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gridcensus -- census of grid storage deployments published in a BDII
#[derive(Debug, Parser)]
#[command(
    name = "gridcensus",
    version,
    about = "Census of grid storage deployments published in a BDII",
    long_about = "Queries a top-level BDII over LDAP and merges what the GLUE 2.0 and\n\
        legacy GLUE 1.3 trees say about StoRM storage services into one\n\
        site / host / version / endpoint census.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Directory profile to use
    #[arg(long, short = 'p', env = "GRIDCENSUS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Directory URL, e.g. ldap://bdii.example.org:2170 (overrides profile)
    #[arg(long, short = 'u', env = "GRIDCENSUS_URL", global = true)]
    pub url: Option<String>,

    /// Replay a snapshot file instead of querying the directory
    #[arg(long, value_name = "FILE", env = "GRIDCENSUS_SNAPSHOT", global = true)]
    pub from_snapshot: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GRIDCENSUS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Directory timeout in seconds (overrides profile)
    #[arg(long, env = "GRIDCENSUS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List storage hosts with version and endpoints
    #[command(alias = "h")]
    Hosts(HostsArgs),

    /// List sites and their host counts
    #[command(alias = "s")]
    Sites,

    /// Show how many deployments run each version
    #[command(alias = "v")]
    Versions,

    /// Show totals and per-pass diagnostics
    Summary,

    /// Write report.html, report.csv and sites.txt
    Report(ReportArgs),

    /// Query the directory and save every answer to a snapshot file
    Snapshot(SnapshotArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CENSUS VIEWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct HostsArgs {
    /// Only hosts at this site (case-insensitive)
    #[arg(long, short = 's')]
    pub site: Option<String>,

    /// Only hosts reporting this version ("-" for unknown)
    #[arg(id = "with_version", long = "with-version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Only hosts seen in this schema
    #[arg(long, value_enum)]
    pub schema: Option<SchemaFilter>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaFilter {
    /// Published in GLUE 2.0
    Glue2,
    /// Published in GLUE 1.3
    Glue1,
    /// Published in both
    Both,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Directory to write the report files into
    #[arg(long, short = 'd', value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Snapshot file to write (JSON)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key: url, glue2_base, glue1_base, bind_dn, password_env, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
