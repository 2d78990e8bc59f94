//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// i18nctl - query and maintain token catalogs through the i18n engine
///
/// Loads a catalog into the native engine and translates tokens, prints
/// catalog metadata, runs the engine's self-check or exports the binary form.
#[derive(Parser, Debug)]
#[command(
    name = "i18nctl",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "I18NCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human, or output.format from the config]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to the engine shared library (overrides config and environment)
    #[arg(long, global = true, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a token, substituting positional arguments
    Translate(TranslateArgs),

    /// Translate a token using the catalog's plural rule
    Plural(PluralArgs),

    /// Show the catalog's locale, fallback, note and plural rule
    Meta(MetaArgs),

    /// Export the loaded catalog in binary form
    Export(ExportArgs),

    /// Print every token in the catalog
    Dump(DumpArgs),

    /// Search tokens and texts
    Find(FindArgs),

    /// Run the engine's catalog self-check
    Check(CheckArgs),

    /// Show engine library and version information
    Info,

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Catalog selection shared by every catalog-based command
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Text catalog to load
    #[arg(long, value_name = "FILE", env = "I18NCTL_CATALOG")]
    pub catalog: PathBuf,

    /// Skip malformed catalog lines instead of failing
    #[arg(long)]
    pub lenient: bool,
}

impl CatalogArgs {
    /// Whether the engine should reject malformed lines
    pub fn strict(&self) -> bool {
        !self.lenient
    }
}

/// Arguments for the translate command
#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// Token to translate
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Positional arguments substituted for %0, %1, ...
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for the plural command
#[derive(Parser, Debug)]
pub struct PluralArgs {
    /// Token to translate
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Count that selects the plural variant
    #[arg(value_name = "COUNT", allow_negative_numbers = true)]
    pub count: i32,

    /// Positional arguments substituted for %0, %1, ...
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for the meta command
#[derive(Parser, Debug)]
pub struct MetaArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for the export command
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Destination of the binary catalog
    #[arg(value_name = "OUTPUT")]
    pub destination: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for the dump command
#[derive(Parser, Debug)]
pub struct DumpArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for the find command
#[derive(Parser, Debug)]
pub struct FindArgs {
    /// Case-insensitive text to look for in tokens and texts
    #[arg(value_name = "QUERY")]
    pub query: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Treat warnings as a failed check
    #[arg(long)]
    pub deny_warnings: bool,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show(ConfigShowArgs),
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
