//! Options that drive one config assembly.
//!
//! Every path convention the assembler relies on lives here so discovery can be
//! exercised against synthetic layouts.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AssembleError, Result};

/// Bundler mode for the emitted configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Production,
    Development,
}

impl BuildMode {
    /// Source map style handed to the bundler, if any.
    pub fn devtool(self) -> Option<&'static str> {
        match self {
            BuildMode::Development => Some("inline-source-map"),
            BuildMode::Production => None,
        }
    }

    /// Output directory used when none is configured, relative to the project root.
    pub fn default_out_dir(self) -> &'static str {
        match self {
            BuildMode::Development => ".xtensio/dev",
            BuildMode::Production => ".xtensio/build",
        }
    }
}

/// Conventional locations of each extension surface, relative to the project root.
///
/// `popup`, `background` and `manifest` are path stems: discovery tries each of
/// `script_extensions` in order and takes the first file that exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConventions {
    pub popup: PathBuf,
    pub background: PathBuf,
    pub contents_dir: PathBuf,
    pub manifest: PathBuf,
    pub script_extensions: Vec<String>,
}

impl Default for ProjectConventions {
    fn default() -> Self {
        Self {
            popup: PathBuf::from("popup/popup"),
            background: PathBuf::from("background/index"),
            contents_dir: PathBuf::from("contents"),
            manifest: PathBuf::from("manifest"),
            script_extensions: ["tsx", "ts", "jsx", "js"].map(String::from).to_vec(),
        }
    }
}

impl ProjectConventions {
    /// Whether `path` carries one of the configured script extensions.
    pub fn is_script(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.script_extensions.iter().any(|e| e == ext))
    }

    /// File name of the popup entry without its extension (`popup`).
    pub fn popup_stem(&self) -> String {
        self.popup
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "popup".to_string())
    }

    fn validate(&self) -> Result<()> {
        if self.script_extensions.is_empty() {
            return Err(AssembleError::InvalidConfig {
                field: "conventions.scriptExtensions",
                hint: "at least one script extension is required".to_string(),
            });
        }
        if let Some(ext) = self
            .script_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(AssembleError::InvalidConfig {
                field: "conventions.scriptExtensions",
                hint: format!("extensions are written without a leading dot (got {ext:?})"),
            });
        }
        for (field, path) in [
            ("conventions.popup", &self.popup),
            ("conventions.background", &self.background),
            ("conventions.contentsDir", &self.contents_dir),
            ("conventions.manifest", &self.manifest),
        ] {
            if path.as_os_str().is_empty() || path.is_absolute() {
                return Err(AssembleError::InvalidConfig {
                    field,
                    hint: format!("must be a non-empty path relative to the project root (got {path:?})"),
                });
            }
        }
        Ok(())
    }
}

/// Loader shims injected in front of the script transform for popup and content files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ShimLoaders {
    /// Wraps the popup's default export in a render call.
    pub render_mount: PathBuf,
    /// Adds the React import that content components rely on.
    pub import_react: PathBuf,
}

impl Default for ShimLoaders {
    fn default() -> Self {
        Self {
            render_mount: PathBuf::from("node_modules/xtensio/loaders/reactMountLoader.js"),
            import_react: PathBuf::from("node_modules/xtensio/loaders/importReactLoader.js"),
        }
    }
}

/// Everything the assembler needs besides the project root and a toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AssemblerOptions {
    pub mode: BuildMode,

    /// Bundler output directory; defaults per [`BuildMode::default_out_dir`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Scratch directory for compiled manifest and content modules.
    pub scratch_dir: PathBuf,

    /// Upper bound on content scripts compiled at the same time.
    pub concurrency: usize,

    pub conventions: ProjectConventions,

    pub shims: ShimLoaders,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            mode: BuildMode::default(),
            out_dir: None,
            scratch_dir: PathBuf::from(".xtensio/tmp"),
            concurrency: 8,
            conventions: ProjectConventions::default(),
            shims: ShimLoaders::default(),
        }
    }
}

impl AssemblerOptions {
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Output directory resolved against `root`.
    pub fn resolved_out_dir(&self, root: &Path) -> PathBuf {
        let dir = self
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.mode.default_out_dir()));
        root.join(dir)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(AssembleError::InvalidConfig {
                field: "concurrency",
                hint: "must be at least 1".to_string(),
            });
        }
        if self.scratch_dir.as_os_str().is_empty() {
            return Err(AssembleError::InvalidConfig {
                field: "scratchDir",
                hint: "scratch directory cannot be empty".to_string(),
            });
        }
        self.conventions.validate()
    }
}
