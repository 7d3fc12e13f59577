//! Clap derive structures for the `cpgate` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cpgate -- Check Point gateway proxy and console
#[derive(Debug, Parser)]
#[command(
    name = "cpgate",
    version,
    about = "Proxy and console for Check Point gateway objects",
    long_about = "Runs a local proxy in front of the Check Point management API\n\
        and drives it from the command line. Existing gateways can be\n\
        cloned and published as new objects.",
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
    /// Proxy server URL (console commands)
    #[arg(long, env = "CPGATE_PROXY", global = true)]
    pub proxy: Option<String>,

    /// Management domain
    #[arg(long, short = 'd', env = "CPGATE_DOMAIN", global = true)]
    pub domain: Option<String>,

    /// Management API key
    #[arg(long, env = "CPGATE_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

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

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the proxy server
    Serve(ServeArgs),

    /// List, inspect, and clone gateways through the proxy
    #[command(alias = "gw")]
    Gateways(GatewaysArgs),

    /// Inspect configuration and store credentials
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides config)
    #[arg(long, short = 'b', env = "CPGATE_BIND")]
    pub bind: Option<String>,

    /// Management server URL (overrides config)
    #[arg(long, short = 'm', env = "CPGATE_MANAGEMENT_URL")]
    pub management_url: Option<String>,

    /// Accept self-signed management certificates
    #[arg(long, short = 'k')]
    pub insecure: bool,

    /// Custom CA certificate for the management server
    #[arg(long)]
    pub ca_cert: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct GatewaysArgs {
    #[command(subcommand)]
    pub command: GatewaysCommand,
}

#[derive(Debug, Subcommand)]
pub enum GatewaysCommand {
    /// List gateways and servers
    #[command(alias = "ls")]
    List,

    /// Show one gateway in detail
    Show {
        /// Gateway uid
        uid: String,
    },

    /// Copy a gateway, apply edits, and save it as a new gateway
    Clone(CloneArgs),
}

#[derive(Debug, Args)]
pub struct CloneArgs {
    /// uid of the gateway to copy
    pub uid: String,

    /// Name of the new gateway (default: <name>_copy)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    #[arg(long)]
    pub comments: Option<String>,

    /// IPv4 address (empty string clears it)
    #[arg(long)]
    pub ipv4: Option<String>,

    /// IPv6 address (empty string clears it)
    #[arg(long)]
    pub ipv6: Option<String>,

    /// SIC name
    #[arg(long)]
    pub sic_name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Print the effective configuration
    Show,

    /// Store an API key for a domain in the system keyring
    SetKey {
        /// Management domain
        domain: String,
    },
}
