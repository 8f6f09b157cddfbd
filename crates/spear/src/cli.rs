//! Clap derive structures for the `spear` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// spear -- command-line client for the Odin telephony-management API
#[derive(Debug, Parser)]
#[command(
    name = "spear",
    version,
    about = "Query and manage an Odin telephony API from the command line",
    long_about = "A CLI for the Odin telephony-management API.\n\n\
        All calls go through one rate-limited dispatcher (5 calls per second\n\
        by default), so large lookups such as find-alias stay within the\n\
        remote API's limits.",
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
    /// Config profile to use
    #[arg(long, short = 'p', env = "SPEAR_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL, e.g. https://odin.example.com/api/v2 (overrides profile)
    #[arg(long, short = 'u', env = "SPEAR_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, env = "SPEAR_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SPEAR_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Send calls without client-side rate limiting
    #[arg(long, global = true)]
    pub no_rate_limit: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SPEAR_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SPEAR_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find which auto attendant, hunt group, call center or user owns an alias
    #[command(alias = "fa")]
    FindAlias(FindAliasArgs),

    /// Show details of the current login session
    Session,

    /// Manage groups of a service provider
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared group scope ───────────────────────────────────────────────

/// Service provider and group, defaulting to the profile's values.
#[derive(Debug, Args)]
pub struct GroupScope {
    /// Service provider (enterprise) ID
    #[arg(long, short = 's', env = "SPEAR_SERVICE_PROVIDER")]
    pub service_provider: Option<String>,

    /// Group ID
    #[arg(long, short = 'g', env = "SPEAR_GROUP")]
    pub group: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FIND ALIAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FindAliasArgs {
    /// Bare alias to look for (the part before '@')
    pub alias: String,

    #[command(flatten)]
    pub scope: GroupScope,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List the groups of a service provider
    #[command(alias = "ls")]
    List {
        /// Service provider (enterprise) ID
        #[arg(long, short = 's', env = "SPEAR_SERVICE_PROVIDER")]
        service_provider: Option<String>,
    },

    /// Show one group
    Get {
        #[command(flatten)]
        scope: GroupScope,
    },

    /// Create a group
    Create {
        #[command(flatten)]
        scope: GroupScope,

        /// Display name
        #[arg(long)]
        name: String,

        /// Maximum number of users
        #[arg(long, default_value = "25")]
        user_limit: u32,

        /// Default SIP domain
        #[arg(long)]
        domain: String,
    },

    /// Update group fields from a JSON object, e.g. '{"timeZone":"Europe/London"}'
    Update {
        #[command(flatten)]
        scope: GroupScope,

        /// JSON object with the fields to change
        #[arg(long)]
        data: String,
    },

    /// Delete a group
    Delete {
        #[command(flatten)]
        scope: GroupScope,
    },
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
    /// Print the config file location
    Path,

    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
