//! External tools used to turn a source file into a loaded value.
//!
//! The assembler never links a JavaScript engine. It shells out to a TypeScript
//! compiler for the compile step and to Node.js for evaluation, and only ever
//! sees the evaluated export as JSON.

use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use crate::error::{AssembleError, Result};

/// Compiler flags that are always passed. The output directory is added per call.
pub const COMPILER_FLAGS: &[&str] = &[
    "--resolveJsonModule",
    "--esModuleInterop",
    "--jsx",
    "react",
    "--allowUmdGlobalAccess",
];

/// Evaluates one compiled module and prints its export as JSON.
///
/// Functions are reduced to `{ "name": ... }` so component references survive
/// serialization. CommonJS output compiled from `export default` is unwrapped.
const EVALUATE_SCRIPT: &str = r#"
const { pathToFileURL } = require("node:url");
import(pathToFileURL(process.argv[1]).href)
  .then((ns) => {
    let value = ns.default !== undefined ? ns.default : ns;
    if (value && value.__esModule && value.default !== undefined) value = value.default;
    const json = JSON.stringify(value === undefined ? null : value, (_key, v) =>
      typeof v === "function" ? (v.name ? { name: v.name } : null) : v
    );
    process.stdout.write(json === undefined ? "null" : json);
  })
  .catch((err) => {
    process.stderr.write(String((err && err.stack) || err));
    process.exit(1);
  });
"#;

/// The compile and evaluate steps behind [`crate::ScriptCompiler`].
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Compile `source` into `out_dir`. Where exactly the output lands is up to
    /// the compiler; the caller probes for it.
    async fn compile(&self, source: &Path, out_dir: &Path) -> Result<()>;

    /// Load a compiled module and return its default export, or the whole
    /// module when there is no default export.
    async fn evaluate(&self, module: &Path) -> Result<Value>;
}

/// `tsc` + `node` toolchain, run from the project root so locally installed
/// packages resolve.
#[derive(Debug, Clone)]
pub struct NodeToolchain {
    cwd: PathBuf,
    compiler: Vec<String>,
    node: String,
}

impl NodeToolchain {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            compiler: vec!["npx".to_string(), "tsc".to_string()],
            node: "node".to_string(),
        }
    }

    /// Compiler command line, program first (e.g. `["yarn", "tsc"]`).
    pub fn with_compiler(mut self, command: Vec<String>) -> Result<Self> {
        if command.is_empty() {
            return Err(AssembleError::InvalidConfig {
                field: "compiler",
                hint: "compiler command cannot be empty".to_string(),
            });
        }
        self.compiler = command;
        Ok(self)
    }

    pub fn with_node(mut self, program: impl Into<String>) -> Self {
        self.node = program.into();
        self
    }

    async fn run(&self, mut command: Command, program: &str) -> Result<Output> {
        command.current_dir(&self.cwd).kill_on_drop(true);
        command.output().await.map_err(|source| AssembleError::Spawn {
            program: program.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Toolchain for NodeToolchain {
    async fn compile(&self, source: &Path, out_dir: &Path) -> Result<()> {
        let (program, prefix) = self
            .compiler
            .split_first()
            .ok_or_else(|| AssembleError::InvalidConfig {
                field: "compiler",
                hint: "compiler command cannot be empty".to_string(),
            })?;

        let mut command = Command::new(program);
        command
            .args(prefix)
            .arg(source)
            .arg("--outDir")
            .arg(out_dir)
            .args(COMPILER_FLAGS);

        tracing::debug!("compiling {} into {}", source.display(), out_dir.display());
        let output = self.run(command, program).await?;

        if !output.status.success() {
            // tsc reports diagnostics on stdout
            let mut diagnostics = String::from_utf8_lossy(&output.stdout).trim().to_string();
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                if !diagnostics.is_empty() {
                    diagnostics.push('\n');
                }
                diagnostics.push_str(stderr.trim());
            }
            return Err(AssembleError::Compile {
                source_path: source.to_path_buf(),
                status: output.status,
                stderr: diagnostics,
            });
        }

        Ok(())
    }

    async fn evaluate(&self, module: &Path) -> Result<Value> {
        let mut command = Command::new(&self.node);
        command.arg("-e").arg(EVALUATE_SCRIPT).arg(module);

        let output = self.run(command, &self.node).await?;
        if !output.status.success() {
            return Err(AssembleError::Load {
                module_path: module.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| AssembleError::Load {
            module_path: module.to_path_buf(),
            message: format!("export is not JSON-serializable: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_compiler_command_is_rejected() {
        let result = NodeToolchain::new("/p").with_compiler(Vec::new());
        assert!(matches!(
            result,
            Err(AssembleError::InvalidConfig { field: "compiler", .. })
        ));
    }

    #[tokio::test]
    async fn missing_compiler_reports_spawn_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let toolchain = NodeToolchain::new(dir.path())
            .with_compiler(vec!["xtensio-no-such-compiler".to_string()])
            .unwrap();

        let err = toolchain
            .compile(&dir.path().join("manifest.ts"), &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssembleError::Spawn { ref program, .. } if program == "xtensio-no-such-compiler"));
    }

    /// Evaluates `file` with the real `node`, or `None` when node isn't installed.
    async fn evaluate_with_node(dir: &Path, file: &str, source: &str) -> Option<Value> {
        let module = dir.join(file);
        std::fs::write(&module, source).unwrap();
        match NodeToolchain::new(dir).evaluate(&module).await {
            Err(AssembleError::Spawn { .. }) => None,
            other => Some(other.unwrap()),
        }
    }

    #[tokio::test]
    async fn node_unwraps_compiled_default_export() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = r#"
            "use strict";
            Object.defineProperty(exports, "__esModule", { value: true });
            function Banner() { return null; }
            exports.default = { matches: ["https://x.com/*"], component: Banner, shadowRoot: true };
        "#;
        let Some(value) = evaluate_with_node(dir.path(), "banner.js", source).await else {
            return;
        };

        assert_eq!(
            value,
            serde_json::json!({
                "matches": ["https://x.com/*"],
                "component": { "name": "Banner" },
                "shadowRoot": true
            })
        );
    }

    #[tokio::test]
    async fn node_returns_namespace_without_default_export() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = r#"
            export const matches = ["https://y.com/*"];
            export const component = "div";
        "#;
        let Some(value) = evaluate_with_node(dir.path(), "inline.mjs", source).await else {
            return;
        };

        assert_eq!(value, serde_json::json!({ "matches": ["https://y.com/*"], "component": "div" }));
    }

    #[tokio::test]
    async fn node_failure_is_a_load_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let module = dir.path().join("broken.js");
        std::fs::write(&module, "throw new Error('boom');").unwrap();

        match NodeToolchain::new(dir.path()).evaluate(&module).await {
            Err(AssembleError::Spawn { .. }) => {}
            Err(AssembleError::Load { message, .. }) => assert!(message.contains("boom")),
            other => panic!("expected a load error, got {other:?}"),
        }
    }
}
