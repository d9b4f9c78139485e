//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// modconf - Resolve file and package references in configuration files
#[derive(Parser, Debug)]
#[command(name = "modconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve a configuration file and print the result
    ///
    /// Examples:
    ///   modconf resolve config/app.yaml
    ///   modconf resolve config/app.yaml --format yaml
    ///   modconf resolve config/app.yaml --project-root . --report
    Resolve(ResolveArgs),

    /// Resolve a routing file and bind every route's handler
    Routes(ResolveArgs),
}

/// Arguments shared by `resolve` and `routes`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ResolveArgs {
    /// Configuration file to resolve
    pub file: PathBuf,

    /// Directory `./` references are relative to (default: the file's directory)
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Directory holding the installed-dependencies directory (default: current directory)
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Name of the installed-dependencies directory
    #[arg(long)]
    pub modules_dir: Option<String>,

    /// Also resolve references inside referenced files
    #[arg(long)]
    pub nested: bool,

    /// Read resolver options from a TOML, JSON or YAML file
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Print package diagnostics to stderr after resolving
    #[arg(long)]
    pub report: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}
