//! Configuration for the xtensio CLI with multi-source loading.
//!
//! Priority: CLI > Environment > File > Defaults

mod defaults;
mod loading;
mod validation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xtensio_config::{AssemblerOptions, BuildMode, NodeToolchain, ProjectConventions, ShimLoaders};

use crate::error::Result;

pub use defaults::*;
pub use loading::{CliOverrides, ENV_PREFIX, env_key};

/// xtensio configuration, loaded from `xtensio.config.json`, `XTENSIO_*`
/// variables and CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct XtensioConfig {
    /// Mode used by `inspect` when `--mode` is absent. `build` and `dev` fix their own mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<BuildMode>,

    /// Bundler output directory (defaults to `.xtensio/build` or `.xtensio/dev`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Scratch directory for compiled manifest and content modules
    pub scratch_dir: PathBuf,

    /// Maximum number of content scripts compiled at once
    pub concurrency: usize,

    /// TypeScript compiler command; output flags are appended
    pub compiler: Vec<String>,

    /// Program that evaluates compiled modules
    pub node: String,

    /// Bundler command; `{config}` is replaced with the assembled config path
    pub bundler: Vec<String>,

    /// Packager and runner command (`web-ext` compatible)
    pub packager: Vec<String>,

    /// Package the production bundle after a successful build
    pub package: bool,

    /// Where packaged zips are written, relative to the project root
    pub artifacts_dir: PathBuf,

    pub conventions: ProjectConventions,

    pub shims: ShimLoaders,
}

impl Default for XtensioConfig {
    fn default() -> Self {
        let options = AssemblerOptions::default();
        Self {
            mode: None,
            out_dir: None,
            scratch_dir: options.scratch_dir,
            concurrency: options.concurrency,
            compiler: default_compiler(),
            node: default_node(),
            bundler: default_bundler(),
            packager: default_packager(),
            package: true,
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            conventions: options.conventions,
            shims: options.shims,
        }
    }
}

impl XtensioConfig {
    /// Assembler options for one run in `mode`.
    pub fn assembler_options(&self, mode: BuildMode) -> AssemblerOptions {
        AssemblerOptions {
            mode,
            out_dir: self.out_dir.clone(),
            scratch_dir: self.scratch_dir.clone(),
            concurrency: self.concurrency,
            conventions: self.conventions.clone(),
            shims: self.shims.clone(),
        }
    }

    /// The `tsc` + `node` toolchain rooted at `root`.
    pub fn toolchain(&self, root: &Path) -> Result<NodeToolchain> {
        Ok(NodeToolchain::new(root)
            .with_compiler(self.compiler.clone())?
            .with_node(self.node.clone()))
    }

    /// Where the assembled bundler configuration is written: next to the scratch directory.
    pub fn bundler_config_path(&self, root: &Path) -> PathBuf {
        let parent = self.scratch_dir.parent().unwrap_or(Path::new(""));
        root.join(parent).join(BUNDLER_CONFIG_FILE)
    }

    pub fn artifacts_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.artifacts_dir)
    }
}
