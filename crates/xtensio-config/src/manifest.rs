//! Manifest assembly from ordered fragments.
//!
//! A merge is a list of [`ManifestFragment`]s applied left to right. Each
//! application returns a new manifest; nothing is mutated in place. Top-level
//! keys from later fragments replace earlier ones wholesale (no deep merge),
//! with one exception: `content_scripts` belongs to the content-scripts
//! fragment and is ignored in every other fragment.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::descriptor::ContentScriptDescriptor;
use crate::error::{AssembleError, Result};

/// A manifest object. Key order follows insertion order.
pub type Manifest = Map<String, Value>;

pub const CONTENT_SCRIPTS_KEY: &str = "content_scripts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FragmentSource {
    Base,
    Popup,
    Background,
    ContentScripts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManifestFragment {
    pub source: FragmentSource,
    pub fields: Manifest,
}

impl ManifestFragment {
    /// The project's own manifest export. Must be an object.
    pub fn base(value: Value, path: &Path) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self {
                source: FragmentSource::Base,
                fields,
            }),
            other => Err(AssembleError::InvalidManifest {
                path: path.to_path_buf(),
                found: json_type_name(&other),
            }),
        }
    }

    pub fn popup(html_file: &str) -> Self {
        Self::from_json(FragmentSource::Popup, json!({ "action": { "default_popup": html_file } }))
    }

    pub fn background(service_worker: &str) -> Self {
        Self::from_json(
            FragmentSource::Background,
            json!({ "background": { "service_worker": service_worker } }),
        )
    }

    /// One `{ matches, js }` entry per eligible descriptor, in the given order.
    pub fn content_scripts(descriptors: &[ContentScriptDescriptor]) -> Self {
        let entries: Vec<Value> = descriptors
            .iter()
            .filter(|d| d.is_eligible())
            .map(|d| {
                json!({
                    "matches": d.matches.clone().unwrap_or_default(),
                    "js": [d.script_file()],
                })
            })
            .collect();
        Self::from_json(FragmentSource::ContentScripts, json!({ CONTENT_SCRIPTS_KEY: entries }))
    }

    fn from_json(source: FragmentSource, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Manifest::new(),
        };
        Self { source, fields }
    }

    /// Apply this fragment on top of `manifest`.
    pub fn apply(&self, manifest: &Manifest) -> Manifest {
        let mut next = manifest.clone();
        for (key, value) in &self.fields {
            if key == CONTENT_SCRIPTS_KEY && self.source != FragmentSource::ContentScripts {
                continue;
            }
            next.insert(key.clone(), value.clone());
        }
        next
    }
}

/// Ordered fragment list with a single merge operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestMerge {
    fragments: Vec<ManifestFragment>,
}

impl ManifestMerge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, fragment: ManifestFragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    pub fn fragments(&self) -> &[ManifestFragment] {
        &self.fragments
    }

    /// Fold all fragments left to right. `content_scripts` is always present in
    /// the result, empty when no content-scripts fragment contributed one.
    pub fn merge(&self) -> Manifest {
        let mut manifest = self
            .fragments
            .iter()
            .fold(Manifest::new(), |acc, fragment| fragment.apply(&acc));
        manifest
            .entry(CONTENT_SCRIPTS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        manifest
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
