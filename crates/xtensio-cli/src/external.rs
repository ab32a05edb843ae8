//! Handoff to the external tools that follow config assembly.
//!
//! The bundler consumes the assembled `bundler.config.json`; the packager
//! (`web-ext` or compatible) zips the bundle or launches it in a browser.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

use crate::config::{CONFIG_PLACEHOLDER, XtensioConfig};
use crate::error::{BuildError, CliError, Result};

/// A program and its arguments, resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

/// Captured result of a finished command.
#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// stdout followed by stderr, for error reports.
    pub fn combined(&self) -> String {
        [self.stdout.trim_end(), self.stderr.trim_end()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ExternalCommand {
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| CliError::InvalidArgument("command must name a program".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Replace `placeholder` inside every argument. Returns whether any argument contained it.
    pub fn substitute(&mut self, placeholder: &str, value: &str) -> bool {
        let mut found = false;
        for arg in &mut self.args {
            if arg.contains(placeholder) {
                *arg = arg.replace(placeholder, value);
                found = true;
            }
        }
        found
    }

    fn command(&self, cwd: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(cwd).kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, err: std::io::Error) -> CliError {
        BuildError::ToolNotFound {
            program: self.program.clone(),
            reason: err.to_string(),
            hint: format!(
                "Install `{}` or change the command in xtensio.config.json",
                self.program
            ),
        }
        .into()
    }

    /// Run to completion with output captured.
    pub async fn output(&self, cwd: &Path) -> Result<ToolOutput> {
        tracing::debug!("running {} {}", self.program, self.args.join(" "));
        let output = self
            .command(cwd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;
        Ok(ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run to completion with the terminal attached.
    pub async fn status(&self, cwd: &Path) -> Result<ExitStatus> {
        tracing::debug!("running {} {}", self.program, self.args.join(" "));
        self.command(cwd)
            .status()
            .await
            .map_err(|e| self.spawn_error(e))
    }
}

/// The bundler command with the config path substituted.
///
/// Without a `{config}` placeholder the path is appended as the last argument.
pub fn bundler_command(config: &XtensioConfig, config_path: &Path) -> Result<ExternalCommand> {
    let mut command = ExternalCommand::from_argv(&config.bundler)?;
    let path = config_path.display().to_string();
    if !command.substitute(CONFIG_PLACEHOLDER, &path) {
        command = command.arg(path);
    }
    Ok(command)
}

/// `web-ext build` for the production bundle.
pub fn package_command(config: &XtensioConfig, source_dir: &Path, artifacts_dir: &Path) -> Result<ExternalCommand> {
    Ok(ExternalCommand::from_argv(&config.packager)?
        .arg("build")
        .arg("--source-dir")
        .arg(source_dir.display().to_string())
        .arg("--overwrite-dest")
        .arg(format!("--artifacts-dir={}", artifacts_dir.display())))
}

/// `web-ext run` for the development bundle.
pub fn runner_command(config: &XtensioConfig, source_dir: &Path) -> Result<ExternalCommand> {
    Ok(ExternalCommand::from_argv(&config.packager)?
        .arg("run")
        .arg("--source-dir")
        .arg(source_dir.display().to_string())
        .arg("--target=chromium"))
}

/// Run the bundler; a non-zero exit is a [`BuildError::BundlerFailed`].
pub async fn run_bundler(config: &XtensioConfig, root: &Path, config_path: &Path) -> Result<ToolOutput> {
    let output = bundler_command(config, config_path)?.output(root).await?;
    if !output.status.success() {
        return Err(BuildError::BundlerFailed {
            status: output.status.to_string(),
            output: output.combined(),
            config_path: config_path.to_path_buf(),
        }
        .into());
    }
    Ok(output)
}

/// Zip the production bundle into the artifacts directory.
pub async fn run_packager(config: &XtensioConfig, root: &Path, out_dir: &Path) -> Result<ToolOutput> {
    let output = package_command(config, out_dir, &config.artifacts_dir(root))?
        .output(root)
        .await?;
    if !output.status.success() {
        return Err(BuildError::PackagingFailed {
            status: output.status.to_string(),
            output: output.combined(),
        }
        .into());
    }
    Ok(output)
}

/// Launch the development bundle; returns when the browser session ends.
pub async fn run_extension(config: &XtensioConfig, root: &Path, out_dir: &Path) -> Result<()> {
    let status = runner_command(config, out_dir)?.status(root).await?;
    if !status.success() {
        return Err(BuildError::RunnerFailed {
            status: status.to_string(),
        }
        .into());
    }
    Ok(())
}
