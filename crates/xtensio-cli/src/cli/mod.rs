//! Command-line interface definition for xtensio.
//!
//! - `xtensio build` - production bundle, then a packaged zip
//! - `xtensio dev` - development bundle, then launch it in a browser
//! - `xtensio inspect` - print the assembled bundler configuration

mod commands;
pub mod enums;
mod validation;

use clap::Parser;

pub use commands::{BuildArgs, Command, DevArgs, InspectArgs, ProjectArgs};
pub use enums::ModeArg;
pub use validation::parse_concurrency;

/// xtensio - build browser extensions from a conventional project layout
#[derive(Parser, Debug)]
#[command(
    name = "xtensio",
    version,
    about = "Build browser extensions from a conventional project layout",
    long_about = "xtensio discovers the popup, background worker, content scripts and manifest\n\
                  of an extension project, assembles a bundler configuration for them, and\n\
                  drives the bundler, packager and browser runner."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
