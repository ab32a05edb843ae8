//! Error types for the xtensio CLI.
//!
//! `CliError` is what every command returns. Domain errors (`ConfigError`,
//! `BuildError`) carry a hint telling the user what to change, and assembly
//! failures from `xtensio-config` pass through untouched so the diagnostic
//! layer can render them with their own hints.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xtensio_cli::error::{Result, ResultExt};
//!
//! fn read_config(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

mod diagnostic;

use std::path::PathBuf;

use thiserror::Error;
use xtensio_config::AssembleError;

pub use diagnostic::{assemble_error_to_miette, build_error_to_miette, cli_error_to_miette};

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file or override problems
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bundling, packaging or launching failed
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Discovering the project or assembling its build configuration failed
    #[error("{0}")]
    Assemble(#[from] AssembleError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Configuration errors raised while loading `xtensio.config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file doesn't exist
    #[error("Config file not found: {}\n\nHint: Create the file or drop --config to use xtensio.config.json from the project root", .0.display())]
    NotFound(PathBuf),

    /// The merged sources could not be deserialized
    #[error("Failed to load configuration: {message}\n\nHint: Check xtensio.config.json syntax and XTENSIO_* environment variables")]
    LoadFailed { message: String },

    /// A value parsed but is not usable
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

/// Failures in the external stages that follow config assembly.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An external program could not be started
    #[error("Could not run `{program}`: {reason}\n\nHint: {hint}")]
    ToolNotFound {
        program: String,
        reason: String,
        hint: String,
    },

    /// The bundler exited unsuccessfully
    #[error("Bundler failed ({status})\n{output}\n\nHint: The assembled configuration was kept at {}", .config_path.display())]
    BundlerFailed {
        status: String,
        output: String,
        config_path: PathBuf,
    },

    /// Packaging the bundled extension failed
    #[error("Packaging failed ({status})\n{output}\n\nHint: Re-run with --no-package to skip packaging")]
    PackagingFailed { status: String, output: String },

    /// The browser runner exited unsuccessfully
    #[error("Extension runner exited with {status}\n\nHint: Re-run with --no-run to only build the development bundle")]
    RunnerFailed { status: String },

    /// Output directory is not writable
    #[error("Output directory is not writable: {}\n\nHint: Check directory permissions or pass a different --out-dir", .0.display())]
    OutputNotWritable(PathBuf),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for attaching context to errors.
pub trait ResultExt<T> {
    /// Turn a NotFound I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }
}
