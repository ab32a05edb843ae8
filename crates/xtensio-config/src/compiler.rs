//! Compile-then-load for manifest and content-script sources.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::error::{AssembleError, Result};
use crate::toolchain::Toolchain;
use crate::workspace::Workspace;

/// One compiled source and its evaluated export. Never reused across builds.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledModule {
    pub source: PathBuf,
    /// Compiled output on disk; the source itself for JSON modules.
    pub path: PathBuf,
    pub value: Value,
}

#[derive(Clone)]
pub struct ScriptCompiler {
    toolchain: Arc<dyn Toolchain>,
    workspace: Workspace,
    project_root: PathBuf,
}

impl ScriptCompiler {
    pub fn new(toolchain: Arc<dyn Toolchain>, workspace: Workspace, project_root: impl Into<PathBuf>) -> Self {
        Self {
            toolchain,
            workspace,
            project_root: project_root.into(),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Compile `source` into its arena and return the compiled file.
    ///
    /// The compiler decides the output layout from its own root heuristics, so
    /// the known candidate locations are probed in order.
    pub async fn compile(&self, source: &Path) -> Result<PathBuf> {
        let arena = self.workspace.prepare_arena(source).await?;
        self.toolchain.compile(source, &arena).await?;

        let candidates = output_candidates(source, &arena, &self.project_root);
        for candidate in &candidates {
            if tokio::fs::try_exists(candidate).await? {
                tracing::trace!("resolved {} -> {}", source.display(), candidate.display());
                return Ok(candidate.clone());
            }
        }

        Err(AssembleError::ModuleResolution {
            source_path: source.to_path_buf(),
            candidates,
        })
    }

    pub async fn load(&self, compiled: &Path) -> Result<Value> {
        self.toolchain.evaluate(compiled).await
    }

    /// Compile and load in one step. JSON sources are read as-is.
    pub async fn compile_and_load(&self, source: &Path) -> Result<CompiledModule> {
        if source.extension().is_some_and(|ext| ext == "json") {
            let bytes = tokio::fs::read(source).await?;
            return Ok(CompiledModule {
                source: source.to_path_buf(),
                path: source.to_path_buf(),
                value: serde_json::from_slice(&bytes)?,
            });
        }

        let path = self.compile(source).await?;
        let value = self.load(&path).await?;
        Ok(CompiledModule {
            source: source.to_path_buf(),
            path,
            value,
        })
    }
}

/// Candidate output files, in probe order:
/// 1. `<out>/<basename>.js`
/// 2. `<out>/<path relative to project root>.js`
pub fn output_candidates(source: &Path, out_dir: &Path, project_root: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);

    if let Some(stem) = source.file_stem() {
        let mut name = stem.to_os_string();
        name.push(".js");
        candidates.push(out_dir.join(name));
    }

    if let Ok(relative) = source.strip_prefix(project_root) {
        let candidate = out_dir.join(relative.with_extension("js"));
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    candidates
}
