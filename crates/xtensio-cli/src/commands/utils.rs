//! Helpers shared by the commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use xtensio_config::{AssembledBuild, Assembler, BuildConfig, BuildMode, Toolchain};

use crate::cli::ProjectArgs;
use crate::config::{CliOverrides, XtensioConfig};
use crate::error::{BuildError, CliError, Result, ResultExt};
use crate::{external, ui};

/// Resolve a path against `cwd` unless it is already absolute.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

pub fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| CliError::Custom(format!("Failed to get current directory: {e}")))
}

/// The project root: `--cwd` if given, else the current directory.
pub fn resolve_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = get_cwd()?;
    let root = match explicit {
        Some(dir) => resolve_path(dir, &cwd),
        None => cwd,
    };
    if !root.is_dir() {
        return Err(CliError::FileNotFound(root));
    }
    Ok(root)
}

/// Load configuration for `root`, resolving `--config` against the current directory.
pub fn load_config(project: &ProjectArgs, root: &Path, mut overrides: CliOverrides) -> Result<XtensioConfig> {
    let config_path = match &project.config {
        Some(path) => Some(resolve_path(path, &get_cwd()?)),
        None => None,
    };
    overrides.concurrency = overrides.concurrency.or(project.concurrency);
    XtensioConfig::load(root, config_path.as_deref(), &overrides)
}

/// Discover the project and assemble its bundler configuration.
pub async fn assemble(config: &XtensioConfig, root: &Path, mode: BuildMode) -> Result<AssembledBuild> {
    let toolchain: Arc<dyn Toolchain> = Arc::new(config.toolchain(root)?);
    let assembler = Assembler::new(config.assembler_options(mode), toolchain)?;

    let spinner = ui::Spinner::new("Assembling build configuration...");
    match assembler.assemble(root).await {
        Ok(build) => {
            spinner.finish(&format!(
                "Assembled {} entries ({} content scripts)",
                build.config.entry.len(),
                build.content_scripts.len()
            ));
            Ok(build)
        }
        Err(err) => {
            spinner.fail("Assembly failed");
            Err(err.into())
        }
    }
}

/// Serialize `config` to `path`, creating parent directories.
pub async fn write_bundler_config(path: &Path, config: &BuildConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|_| BuildError::OutputNotWritable(parent.to_path_buf()))?;
    }
    let json = serde_json::to_vec_pretty(config)?;
    tokio::fs::write(path, json).await.with_path(path)?;
    tracing::debug!("wrote bundler configuration to {}", path.display());
    Ok(())
}

/// Assemble, hand the configuration to the bundler, and print its stats.
///
/// Returns the bundle's output directory.
pub async fn assemble_and_bundle(config: &XtensioConfig, root: &Path, mode: BuildMode) -> Result<PathBuf> {
    let build = assemble(config, root, mode).await?;
    ui::print_build_summary(&build.config, root);

    let config_path = config.bundler_config_path(root);
    write_bundler_config(&config_path, &build.config).await?;

    let spinner = ui::Spinner::new("Bundling...");
    match external::run_bundler(config, root, &config_path).await {
        Ok(output) => {
            spinner.finish("Bundled");
            ui::print_tool_output(&output.stdout);
            Ok(build.config.output.path)
        }
        Err(err) => {
            spinner.fail("Bundler failed");
            Err(err)
        }
    }
}
