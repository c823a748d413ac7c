//! Clap derive structures for the `homeweave` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use homeweave_core::Capability;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// homeweave -- drive home-automation controllers through one capability vocabulary
#[derive(Debug, Parser)]
#[command(
    name = "homeweave",
    version,
    about = "Discover, inspect and control home-automation devices",
    long_about = "Talks to home-automation controllers (Jeedom) and exposes their\n\
        devices through a fixed capability vocabulary: toggle, on, off, dim,\n\
        color and temperature.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "HOMEWEAVE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "HOMEWEAVE_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Controller API key
    #[arg(long, env = "HOMEWEAVE_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Provider type (overrides profile)
    #[arg(long, env = "HOMEWEAVE_PROVIDER", global = true)]
    pub provider: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HOMEWEAVE_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "HOMEWEAVE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "HOMEWEAVE_TIMEOUT", global = true)]
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
    /// List supported provider types
    Providers,

    /// Check that the controller is reachable
    Connect,

    /// List and inspect devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Read the canonical state of one or more devices
    #[command(alias = "st")]
    State(StateArgs),

    /// Execute a capability on one or more devices
    #[command(alias = "x")]
    Exec(ExecArgs),

    /// Stream controller change events
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List exposed devices
    #[command(alias = "ls")]
    List,

    /// Show one device with its command mapping
    Get {
        /// Controller-native device id
        device: String,
    },
}

// ── State ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StateArgs {
    /// Controller-native device ids
    #[arg(required = true)]
    pub devices: Vec<String>,
}

// ── Exec ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CapabilityArg {
    Toggle,
    On,
    Off,
    Dim,
    Color,
    Temperature,
}

impl From<CapabilityArg> for Capability {
    fn from(arg: CapabilityArg) -> Self {
        match arg {
            CapabilityArg::Toggle => Self::Toggle,
            CapabilityArg::On => Self::On,
            CapabilityArg::Off => Self::Off,
            CapabilityArg::Dim => Self::Dim,
            CapabilityArg::Color => Self::Color,
            CapabilityArg::Temperature => Self::Temperature,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Capability to execute
    pub capability: CapabilityArg,

    /// Controller-native device ids (several run concurrently)
    #[arg(required = true)]
    pub devices: Vec<String>,

    /// Level for dim / temperature (0-100 is read as a percentage)
    #[arg(long, allow_negative_numbers = true)]
    pub value: Option<f64>,

    /// Target state for toggle (skips the state read)
    #[arg(long)]
    pub state: Option<Switch>,

    /// Hue angle in degrees, for color
    #[arg(long, allow_negative_numbers = true)]
    pub hue: Option<f64>,

    /// Color as #rrggbb
    #[arg(long, conflicts_with = "rgb")]
    pub hex: Option<String>,

    /// Color as r,g,b (0-255 each)
    #[arg(long, value_delimiter = ',', num_args = 3)]
    pub rgb: Option<Vec<u8>>,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many events
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// Stop after this long (e.g. "30s", "5m")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Add or replace a profile
    Add(ConfigAddArgs),

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },

    /// List profile names
    Profiles,

    /// Store a profile's API key in the system keyring
    SetKey {
        /// Profile name
        name: String,

        /// API key (read from stdin when omitted)
        #[arg(long)]
        key: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct ConfigAddArgs {
    /// Profile name
    pub name: String,

    /// Controller base URL
    #[arg(long)]
    pub url: String,

    /// Provider type
    #[arg(long, default_value = "jeedom")]
    pub provider: String,

    /// Environment variable holding the API key
    #[arg(long)]
    pub api_key_env: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// Equipment plugins to expose (repeatable)
    #[arg(long = "equipment-type")]
    pub equipment_types: Vec<String>,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
