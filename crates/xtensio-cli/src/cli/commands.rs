use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::ModeArg;
use crate::cli::validation::parse_concurrency;

/// Available xtensio subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the extension for release
    ///
    /// Assembles a production bundler configuration, runs the bundler, and
    /// packages the output directory into a zip under `zips/`.
    Build(BuildArgs),

    /// Build a development bundle and launch it
    ///
    /// Assembles a development configuration (inline source maps), runs the
    /// bundler, and opens the unpacked extension in Chromium.
    Dev(DevArgs),

    /// Print the assembled bundler configuration
    ///
    /// Runs discovery and config assembly only. Nothing is bundled.
    Inspect(InspectArgs),
}

/// Options shared by every command that works on a project
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Path to the config file
    ///
    /// Defaults to `xtensio.config.json` in the project root, if present.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of content scripts compiled at once
    #[arg(long, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,
}

/// Arguments for the build command
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output directory for the bundled extension
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Skip packaging the bundle into a zip
    #[arg(long)]
    pub no_package: bool,
}

/// Arguments for the dev command
#[derive(Args, Debug, Clone, Default)]
pub struct DevArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output directory for the development bundle
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Build only; don't launch the browser
    #[arg(long)]
    pub no_run: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Mode to assemble for (defaults to `mode` from the config, else production)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Print only the merged extension manifest
    #[arg(long, conflicts_with = "schema")]
    pub manifest: bool,

    /// Print the JSON schema of xtensio.config.json instead
    #[arg(long)]
    pub schema: bool,
}
