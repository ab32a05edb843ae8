//! Bundler configuration handed to the external bundler.
//!
//! Serializes to camelCase JSON. Regex-valued fields (`test`, `include`,
//! `exclude`) hold regex source text; the bundler adapter compiles them.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use serde_json::{Value, json};

use crate::manifest::Manifest;
use crate::options::BuildMode;

/// Scripts the script transform and shim rules apply to.
pub const SCRIPT_TEST: &str = r"\.(js|jsx|ts|tsx)$";
pub const STYLE_TEST: &str = r"\.(css|scss|sass)$";
pub const NODE_MODULES: &str = "node_modules";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    pub mode: BuildMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devtool: Option<String>,
    /// Entry name to source path, in insertion order.
    pub entry: IndexMap<String, PathBuf>,
    pub output: OutputOptions,
    pub transform_rules: Vec<TransformRule>,
    pub resolve_extensions: Vec<String>,
    pub plugins: Vec<PluginConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub path: PathBuf,
    pub filename: String,
}

/// One module rule. The bundler uses the first rule whose conditions match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRule {
    pub test: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    #[serde(rename = "use")]
    pub loaders: Vec<LoaderSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderSpec {
    pub loader: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PluginConfig {
    /// Writes the merged manifest next to the bundles.
    ExtensionManifest { base: Manifest },
    /// Emits an HTML page that loads only the listed chunks.
    Html { chunks: Vec<String>, filename: String },
}

impl LoaderSpec {
    pub fn named(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            options: None,
        }
    }

    pub fn path(loader: &Path) -> Self {
        Self::named(loader.to_string_lossy().into_owned())
    }

    /// Babel with the env, React and TypeScript presets.
    pub fn babel() -> Self {
        Self {
            loader: "babel-loader".to_string(),
            options: Some(json!({
                "presets": [
                    "@babel/preset-env",
                    "@babel/preset-react",
                    "@babel/preset-typescript"
                ]
            })),
        }
    }
}

impl TransformRule {
    /// Whether this rule applies to `path`, using first-match bundler semantics
    /// for `test`, `include` and `exclude`.
    pub fn applies_to(&self, path: &str) -> bool {
        let matches = |pattern: &str| Regex::new(pattern).is_ok_and(|re| re.is_match(path));
        matches(&self.test)
            && self.include.as_deref().is_none_or(matches)
            && !self.exclude.as_deref().is_some_and(matches)
    }
}

impl BuildConfig {
    /// First transform rule that applies to `path`.
    pub fn rule_for(&self, path: impl AsRef<Path>) -> Option<&TransformRule> {
        let path = path.as_ref().to_string_lossy().replace('\\', "/");
        self.transform_rules.iter().find(|rule| rule.applies_to(&path))
    }

    /// The merged manifest carried by the manifest plugin.
    pub fn manifest(&self) -> Option<&Manifest> {
        self.plugins.iter().find_map(|plugin| match plugin {
            PluginConfig::ExtensionManifest { base } => Some(base),
            _ => None,
        })
    }
}
