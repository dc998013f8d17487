//! Command-line interface implementation for hexagen.
//! Provides argument parsing using clap.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::{GenerationConfig, DEFAULT_PORT, DEFAULT_ROOT};

/// Command-line arguments structure for hexagen.
#[derive(Parser, Debug)]
#[command(
    author,
    version = concat!("version ", env!("CARGO_PKG_VERSION")),
    about = "hexagen: scaffold a hexagonal Go service",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Args {
    /// Target directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Go module name [default: service.com/service]
    #[arg(short, long, value_name = "MODULE")]
    pub module: Option<String>,

    /// Server port
    #[arg(short, long, default_value = DEFAULT_PORT)]
    pub port: String,

    /// Add .gitkeep files to generated directories
    #[arg(short, long)]
    pub gitkeep: bool,

    /// Remove the contents of the target directory first
    #[arg(short, long)]
    pub clean: bool,

    /// Ask for every setting interactively
    #[arg(short, long)]
    pub interactive: bool,

    /// Read answers as JSON from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Do not run `go mod tidy` after generation
    #[arg(long)]
    pub skip_install: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub plugin: Option<Plugin>,
}

/// Anything that is not a flag is forwarded to a `hexagen-<name>` executable.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Plugin {
    #[command(external_subcommand)]
    External(Vec<OsString>),
}

impl Args {
    /// Configuration as given on the command line, before answers and prompts.
    pub fn flags(&self) -> GenerationConfig {
        GenerationConfig {
            root: self.root.clone(),
            module: self.module.clone().unwrap_or_default(),
            port: self.port.clone(),
            gitkeep: self.gitkeep,
            clean: self.clean,
        }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for invalid arguments
/// * With status 0 after printing `--help` or `--version`
pub fn get_args() -> Args {
    Args::parse()
}
