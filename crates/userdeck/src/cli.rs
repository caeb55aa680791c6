use clap::{Args, Parser, Subcommand, ValueEnum};
use userdeck_core::SortKey;

#[derive(Debug, Parser)]
#[command(
    name = "userdeck",
    version,
    about = "Browse a remote user directory from the command line",
    long_about = "Browse a remote user directory from the command line.\n\n\
                  Every data command probes the endpoint before fetching, so a dead \
                  server fails fast instead of hanging. `userdeck watch` keeps a \
                  session open and reports when a lost endpoint comes back.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(short, long, global = true, env = "USERDECK_PROFILE")]
    pub profile: Option<String>,

    /// Directory endpoint URL (overrides the profile)
    #[arg(short, long, global = true, env = "USERDECK_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        env = "USERDECK_OUTPUT",
        default_value = "table",
        value_enum
    )]
    pub output: OutputFormat,

    /// When to use colored output
    #[arg(long, global = true, default_value = "auto", value_enum)]
    pub color: ColorMode,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress normal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Connectivity probe deadline in milliseconds
    #[arg(long, global = true, env = "USERDECK_PROBE_TIMEOUT_MS")]
    pub probe_timeout_ms: Option<u64>,

    /// Data fetch deadline in milliseconds
    #[arg(long, global = true, env = "USERDECK_FETCH_TIMEOUT_MS")]
    pub fetch_timeout_ms: Option<u64>,

    /// Passive reconnection probe interval in milliseconds (0 disables)
    #[arg(long, global = true, env = "USERDECK_RECONNECT_INTERVAL_MS")]
    pub reconnect_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON for piping
    JsonCompact,
    /// YAML
    Yaml,
    /// Bare identifiers, one per line
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List users in the directory
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one user in detail
    #[command(alias = "get")]
    Show {
        /// User ID or case-insensitive name/username
        user: String,
    },

    /// Summarize the directory
    Stats,

    /// Probe the endpoint and report connectivity
    Status,

    /// Follow connection state and data changes live
    Watch(WatchArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter by name, city, or company (case-insensitive substring)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort order
    #[arg(long, default_value = "name", value_enum)]
    pub sort: SortField,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortField {
    Name,
    City,
    Company,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Name => SortKey::Name,
            SortField::City => SortKey::City,
            SortField::Company => SortKey::Company,
        }
    }
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Reload data every N seconds (0 = observe only)
    #[arg(long, default_value = "0")]
    pub refresh: u64,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the merged configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Set a value on the active profile
    Set {
        /// One of: endpoint, probe_timeout_ms, fetch_timeout_ms, reconnect_interval_ms
        key: String,
        /// Value to store
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
