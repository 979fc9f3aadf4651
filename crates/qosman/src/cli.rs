//! Clap derive structures for the `qosman` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// qosman -- QoS queues and flows for NFV virtual links
#[derive(Debug, Parser)]
#[command(
    name = "qosman",
    version,
    about = "Allocate and release QoS queues and OVS flows for VNF virtual links",
    long_about = "Translates the quality annotations of VNF virtual links into\n\
        per-hypervisor QoS queues and the OVS flows that use them, through a\n\
        connectivity-management agent.",
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
    /// Configuration file to use instead of /etc/qosman/qos.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Connectivity agent URL (overrides agent.url)
    #[arg(long, short = 'a', global = true, value_name = "URL")]
    pub agent: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
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
    /// Show the queue parameters of a quality tag
    Classify {
        /// Quality tag, e.g. HIGH
        tag: String,
    },

    /// List the quality catalog
    Qualities,

    /// List QoS-annotated virtual links in a set of VNF records
    Links(RecordsArgs),

    /// List servers attached to QoS-annotated links
    Targets {
        #[command(flatten)]
        records: RecordsArgs,

        /// Drop repeated server names
        #[arg(long, short = 'u')]
        unique: bool,
    },

    /// Show the agent's server to hypervisor map
    Hosts,

    /// Show one server's interfaces and queues
    Server {
        /// Hypervisor the server runs on
        hypervisor: String,
        /// Server name
        server: String,
    },

    /// Create queues and flows from an allocation plan
    #[command(alias = "alloc")]
    Allocate(AllocateArgs),

    /// Remove queues and flows of a deployment
    Release(ReleaseArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecordsArgs {
    /// VNF records file (JSON array, or YAML if the extension is .yaml/.yml)
    #[arg(long, short = 'r', value_name = "FILE")]
    pub records: PathBuf,
}

#[derive(Debug, Args)]
pub struct AllocateArgs {
    /// Allocation plan file (JSON, or YAML if the extension is .yaml/.yml)
    #[arg(long, short = 'p', value_name = "FILE")]
    pub plan: PathBuf,

    /// Override the plan's request id
    #[arg(long)]
    pub request_id: Option<String>,
}

#[derive(Debug, Args)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["records", "servers"])))]
pub struct ReleaseArgs {
    /// VNF records of the deployment; servers are derived from their
    /// QoS-annotated links and released in the background
    #[arg(long, short = 'r', value_name = "FILE")]
    pub records: Option<PathBuf>,

    /// Release these servers directly (substring match) and report failures
    #[arg(long, short = 's', value_delimiter = ',', value_name = "NAME")]
    pub servers: Vec<String>,

    /// Deployment identifier used in logs (generated if omitted)
    #[arg(long)]
    pub request_id: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration (token masked)
    Show,
    /// Print the override file path in effect
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
