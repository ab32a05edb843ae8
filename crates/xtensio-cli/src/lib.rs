//! xtensio CLI - build and run browser extensions from a conventional project layout.
//!
//! The heavy lifting (layout discovery, manifest and content-script
//! compilation, build config assembly) lives in `xtensio-config`. This crate
//! wires it to a command line, a layered config file, and the external tools
//! that bundle, package, and launch the extension.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`config`] - `xtensio.config.json` loading via figment
//! - [`commands`] - `build`, `dev` and `inspect`
//! - [`external`] - subprocess handoff to the bundler and packager
//! - [`error`] - CLI error types with actionable hints
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal status output

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
