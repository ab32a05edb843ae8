//! Error types for project discovery, compilation and config assembly.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssembleError>;

#[derive(Debug, Error)]
pub enum AssembleError {
    // Project layout errors
    #[error("manifest not found: expected {}.<ext> in {}", .stem, .root.display())]
    ManifestNotFound { root: PathBuf, stem: String },

    // External tool errors
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("compiling {} failed ({status}): {stderr}", .source_path.display())]
    Compile {
        source_path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("compiled output for {} not found (looked in {})", .source_path.display(), display_paths(.candidates))]
    ModuleResolution {
        source_path: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("loading compiled module {} failed: {message}", .module_path.display())]
    Load { module_path: PathBuf, message: String },

    // Exported value errors
    #[error("invalid content script export in {}: `{field}` must be {expected}", .path.display())]
    InvalidDescriptor {
        path: PathBuf,
        field: &'static str,
        expected: &'static str,
    },

    #[error("manifest {} must export an object, found {found}", .path.display())]
    InvalidManifest { path: PathBuf, found: &'static str },

    // Option errors
    #[error("invalid option `{field}`: {hint}")]
    InvalidConfig { field: &'static str, hint: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
