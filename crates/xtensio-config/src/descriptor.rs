//! Typed view of a content script's exported metadata.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::{AssembleError, Result};

/// Normalized export of one file in the contents directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentScriptDescriptor {
    /// Source file the descriptor came from.
    pub source: PathBuf,
    /// File name without extension; doubles as the bundler entry name.
    pub filename: String,
    /// Original extension including the dot (`.tsx`).
    pub ext: String,
    pub matches: Option<Vec<String>>,
    pub shadow_root: Option<bool>,
    pub component: Option<String>,
}

impl ContentScriptDescriptor {
    /// Build a descriptor from an evaluated export.
    ///
    /// Missing fields are allowed. Fields that are present must have the right
    /// shape, so a typo like `matches: "https://..."` fails the build instead of
    /// silently dropping the script.
    pub fn from_export(source: &Path, export: &Value) -> Result<Self> {
        let (filename, ext) = split_file_name(source);
        let field = |name: &str| export.as_object().and_then(|obj| obj.get(name)).filter(|v| !v.is_null());

        let matches = match field("matches") {
            None => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_owned))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| invalid(source, "matches", "an array of strings"))?,
            ),
            Some(_) => return Err(invalid(source, "matches", "an array of strings")),
        };

        let shadow_root = match field("shadowRoot") {
            None => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(_) => return Err(invalid(source, "shadowRoot", "a boolean")),
        };

        let component = match field("component") {
            None => None,
            Some(value) => Some(
                resolve_component(value).ok_or_else(|| invalid(source, "component", "a string or a named component"))?,
            ),
        };

        Ok(Self {
            source: source.to_path_buf(),
            filename,
            ext,
            matches,
            shadow_root,
            component,
        })
    }

    /// Registered only when at least one match pattern is declared.
    pub fn is_eligible(&self) -> bool {
        self.matches.as_ref().is_some_and(|m| !m.is_empty())
    }

    /// Bundle file the manifest points at.
    pub fn script_file(&self) -> String {
        format!("{}.js", self.filename)
    }
}

/// A named entity (function, class, `{ name }`) resolves to its name, a plain
/// string to itself. `React.memo` and `forwardRef` wrappers serialize without a
/// name, so their wrapped `type` or `render` is followed instead.
fn resolve_component(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .or_else(|| obj.get("type").and_then(resolve_component))
            .or_else(|| obj.get("render").and_then(resolve_component)),
        _ => None,
    }
}

fn split_file_name(source: &Path) -> (String, String) {
    let filename = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (filename, ext)
}

fn invalid(path: &Path, field: &'static str, expected: &'static str) -> AssembleError {
    AssembleError::InvalidDescriptor {
        path: path.to_path_buf(),
        field,
        expected,
    }
}
