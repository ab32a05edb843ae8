//! Shared fixtures: a fake toolchain and a project builder.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;
use xtensio_config::{AssembleError, Result, Toolchain};

/// Marker a source can contain to make the fake compiler fail.
pub const FAIL_MARKER: &str = "@@compile-error@@";

/// Stands in for `tsc` + `node`.
///
/// Sources are written as JSON. "Compiling" copies the file to
/// `<out>/<stem>.js`; "evaluating" parses it back. A `delayMs` field in the
/// source delays the compile, so tests can control completion order.
#[derive(Default)]
pub struct FakeToolchain {
    compiled: Mutex<Vec<PathBuf>>,
}

impl FakeToolchain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn compiled(&self) -> Vec<PathBuf> {
        self.compiled.lock().unwrap().clone()
    }
}

#[async_trait]
impl Toolchain for FakeToolchain {
    async fn compile(&self, source: &Path, out_dir: &Path) -> Result<()> {
        self.compiled.lock().unwrap().push(source.to_path_buf());

        let text = fs::read_to_string(source)?;
        if text.contains(FAIL_MARKER) {
            return Err(AssembleError::Compile {
                source_path: source.to_path_buf(),
                status: failed_status(),
                stderr: "error TS1005: ';' expected.".to_string(),
            });
        }

        if let Ok(value) = serde_json::from_str::<Value>(&text) {
            if let Some(ms) = value.get("delayMs").and_then(Value::as_u64) {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
        }

        let stem = source.file_stem().unwrap().to_string_lossy().into_owned();
        fs::write(out_dir.join(format!("{stem}.js")), text)?;
        Ok(())
    }

    async fn evaluate(&self, module: &Path) -> Result<Value> {
        Ok(serde_json::from_str(&fs::read_to_string(module)?)?)
    }
}

#[cfg(unix)]
fn failed_status() -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(1 << 8)
}

#[cfg(windows)]
fn failed_status() -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(1)
}

/// Temporary extension project.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(self, relative: &str, contents: &str) -> Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    pub fn manifest(self, contents: &str) -> Self {
        self.file("manifest.ts", contents)
    }
}
