//! Build pipeline: discover surfaces, compile the manifest and content scripts,
//! then assemble the bundler configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::build_config::{
    BuildConfig, LoaderSpec, NODE_MODULES, OutputOptions, PluginConfig, SCRIPT_TEST, STYLE_TEST, TransformRule,
};
use crate::compiler::{CompiledModule, ScriptCompiler};
use crate::descriptor::ContentScriptDescriptor;
use crate::discovery::{ProjectDiscovery, ProjectLayout};
use crate::error::{AssembleError, Result};
use crate::manifest::{ManifestFragment, ManifestMerge};
use crate::options::AssemblerOptions;
use crate::registrar::ContentScriptRegistrar;
use crate::toolchain::{NodeToolchain, Toolchain};
use crate::workspace::Workspace;

pub const POPUP_ENTRY: &str = "popup";
pub const BACKGROUND_ENTRY: &str = "background";
pub const RESOLVE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];
pub const OUTPUT_FILENAME: &str = "[name].js";

/// Pure assembly step. Does no I/O besides joining paths.
#[derive(Debug, Clone, Copy)]
pub struct ConfigAssembler<'a> {
    options: &'a AssemblerOptions,
}

impl<'a> ConfigAssembler<'a> {
    pub fn new(options: &'a AssemblerOptions) -> Self {
        Self { options }
    }

    pub fn assemble(
        &self,
        layout: &ProjectLayout,
        manifest: &CompiledModule,
        descriptors: &[ContentScriptDescriptor],
    ) -> Result<BuildConfig> {
        let base = ManifestFragment::base(manifest.value.clone(), &manifest.source)?;
        let merged = self.manifest_merge(layout, base, descriptors).merge();

        Ok(BuildConfig {
            mode: self.options.mode,
            devtool: self.options.mode.devtool().map(str::to_owned),
            entry: self.entries(layout, descriptors),
            output: OutputOptions {
                path: self.options.resolved_out_dir(&layout.root),
                filename: OUTPUT_FILENAME.to_string(),
            },
            transform_rules: self.transform_rules(&layout.root),
            resolve_extensions: RESOLVE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            plugins: vec![
                PluginConfig::ExtensionManifest { base: merged },
                PluginConfig::Html {
                    chunks: vec![POPUP_ENTRY.to_string()],
                    filename: self.popup_html(),
                },
            ],
        })
    }

    /// `popup`, `background`, then one entry per eligible content script.
    ///
    /// A content script named `popup` or `background` replaces that entry.
    pub fn entries(
        &self,
        layout: &ProjectLayout,
        descriptors: &[ContentScriptDescriptor],
    ) -> IndexMap<String, PathBuf> {
        let mut entry = IndexMap::new();
        if layout.has_popup {
            entry.insert(POPUP_ENTRY.to_string(), layout.popup.clone());
        }
        if layout.has_background {
            entry.insert(BACKGROUND_ENTRY.to_string(), layout.background.clone());
        }
        for descriptor in descriptors.iter().filter(|d| d.is_eligible()) {
            entry.insert(descriptor.filename.clone(), descriptor.source.clone());
        }
        entry
    }

    /// base → popup → background → content scripts.
    pub fn manifest_merge(
        &self,
        layout: &ProjectLayout,
        base: ManifestFragment,
        descriptors: &[ContentScriptDescriptor],
    ) -> ManifestMerge {
        let mut merge = ManifestMerge::new().push(base);
        if layout.has_popup {
            merge = merge.push(ManifestFragment::popup(&self.popup_html()));
        }
        if layout.has_background {
            merge = merge.push(ManifestFragment::background(&format!("{BACKGROUND_ENTRY}.js")));
        }
        merge.push(ManifestFragment::content_scripts(descriptors))
    }

    /// Fixed rule list. The shim rules come before the catch-all script rule so
    /// first-match resolution never skips them.
    ///
    /// The popup and contents patterns are anchored at `root`, so directories
    /// with the same names above the project or elsewhere inside it don't match.
    pub fn transform_rules(&self, root: &Path) -> Vec<TransformRule> {
        let conventions = &self.options.conventions;
        let shims = &self.options.shims;

        let popup_test = format!(
            r"^{}\.({})$",
            path_pattern(&root.join(&conventions.popup)),
            conventions
                .script_extensions
                .iter()
                .map(|ext| regex::escape(ext))
                .collect::<Vec<_>>()
                .join("|")
        );
        let contents_include = format!(r"^{}[\\/]", path_pattern(&root.join(&conventions.contents_dir)));

        vec![
            TransformRule {
                test: popup_test,
                include: None,
                exclude: Some(NODE_MODULES.to_string()),
                loaders: vec![LoaderSpec::babel(), LoaderSpec::path(&root.join(&shims.render_mount))],
            },
            TransformRule {
                test: SCRIPT_TEST.to_string(),
                include: Some(contents_include),
                exclude: Some(NODE_MODULES.to_string()),
                loaders: vec![LoaderSpec::babel(), LoaderSpec::path(&root.join(&shims.import_react))],
            },
            TransformRule {
                test: SCRIPT_TEST.to_string(),
                include: None,
                exclude: Some(NODE_MODULES.to_string()),
                loaders: vec![LoaderSpec::babel()],
            },
            TransformRule {
                test: STYLE_TEST.to_string(),
                include: None,
                exclude: None,
                loaders: ["style-loader", "css-loader", "sass-loader"]
                    .into_iter()
                    .map(LoaderSpec::named)
                    .collect(),
            },
        ]
    }

    fn popup_html(&self) -> String {
        format!("{}.html", POPUP_ENTRY)
    }
}

/// Result of one successful assembly.
#[derive(Debug, Clone)]
pub struct AssembledBuild {
    pub layout: ProjectLayout,
    /// Eligible content scripts, in listing order.
    pub content_scripts: Vec<ContentScriptDescriptor>,
    pub config: BuildConfig,
}

/// Runs the whole pipeline for one project root.
///
/// At most one assembly may run per project at a time: the scratch directory
/// is shared and cleared at both ends of a run.
pub struct Assembler {
    options: AssemblerOptions,
    toolchain: Arc<dyn Toolchain>,
}

impl Assembler {
    pub fn new(options: AssemblerOptions, toolchain: Arc<dyn Toolchain>) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, toolchain })
    }

    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    pub async fn assemble(&self, root: &Path) -> Result<AssembledBuild> {
        let workspace = Workspace::new(root.join(&self.options.scratch_dir));
        workspace.clear().await?;

        let layout = ProjectDiscovery::new(self.options.conventions.clone()).discover(root);
        let result = self.compile_and_assemble(layout, workspace.clone()).await;

        // Every compile has been joined by now, success or not.
        let cleared = workspace.clear().await;
        let build = result?;
        cleared?;

        tracing::info!(
            entries = build.config.entry.len(),
            content_scripts = build.content_scripts.len(),
            "assembled build configuration for {}",
            root.display()
        );
        Ok(build)
    }

    async fn compile_and_assemble(&self, layout: ProjectLayout, workspace: Workspace) -> Result<AssembledBuild> {
        let manifest_path = layout.manifest.clone().ok_or_else(|| AssembleError::ManifestNotFound {
            root: layout.root.clone(),
            stem: self.options.conventions.manifest.to_string_lossy().into_owned(),
        })?;

        let compiler = ScriptCompiler::new(self.toolchain.clone(), workspace, &layout.root);

        // The manifest goes first so a broken manifest fails before any
        // content script is compiled.
        let manifest = compiler.compile_and_load(&manifest_path).await?;
        tracing::debug!("loaded manifest from {}", manifest.source.display());

        let registrar = ContentScriptRegistrar::new(
            compiler,
            self.options.conventions.clone(),
            self.options.concurrency,
        );
        let content_scripts = registrar.register(&layout).await?;

        let config = ConfigAssembler::new(&self.options).assemble(&layout, &manifest, &content_scripts)?;
        Ok(AssembledBuild {
            layout,
            content_scripts,
            config,
        })
    }
}

/// Regex for an absolute path that accepts either separator.
fn path_pattern(path: &Path) -> String {
    path.to_string_lossy()
        .split(['/', '\\'])
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[\\/]")
}

/// Assemble `root` with the `tsc` + `node` toolchain.
pub async fn assemble_project(root: &Path, options: AssemblerOptions) -> Result<AssembledBuild> {
    let toolchain: Arc<dyn Toolchain> = Arc::new(NodeToolchain::new(root));
    Assembler::new(options, toolchain)?.assemble(root).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layout(has_popup: bool, has_background: bool) -> ProjectLayout {
        ProjectLayout {
            root: PathBuf::from("/p"),
            popup: PathBuf::from("/p/popup/popup.tsx"),
            has_popup,
            background: PathBuf::from("/p/background/index.ts"),
            has_background,
            contents_dir: PathBuf::from("/p/contents"),
            has_content_dir: false,
            manifest: Some(PathBuf::from("/p/manifest.ts")),
        }
    }

    fn manifest() -> CompiledModule {
        CompiledModule {
            source: PathBuf::from("/p/manifest.ts"),
            path: PathBuf::from("/p/.xtensio/tmp/x/manifest.js"),
            value: json!({ "name": "demo", "manifest_version": 3 }),
        }
    }

    fn descriptor(name: &str, matches: &[&str]) -> ContentScriptDescriptor {
        ContentScriptDescriptor {
            source: PathBuf::from(format!("/p/contents/{name}.ts")),
            filename: name.to_string(),
            ext: ".ts".to_string(),
            matches: Some(matches.iter().map(|m| m.to_string()).collect()),
            shadow_root: None,
            component: None,
        }
    }

    #[test]
    fn popup_only_project() {
        let options = AssemblerOptions::default();
        let config = ConfigAssembler::new(&options)
            .assemble(&layout(true, false), &manifest(), &[])
            .unwrap();

        assert_eq!(config.entry.len(), 1);
        assert_eq!(config.entry["popup"], PathBuf::from("/p/popup/popup.tsx"));

        let manifest = config.manifest().unwrap();
        assert_eq!(manifest["action"]["default_popup"], "popup.html");
        assert!(manifest.get("background").is_none());
        assert_eq!(manifest["content_scripts"], json!([]));
        assert_eq!(manifest["name"], "demo");
    }

    #[test]
    fn ineligible_content_scripts_are_left_out() {
        let options = AssemblerOptions::default();
        let descriptors = [descriptor("a", &["https://x.com/*"]), descriptor("b", &[])];
        let config = ConfigAssembler::new(&options)
            .assemble(&layout(false, false), &manifest(), &descriptors)
            .unwrap();

        assert_eq!(config.entry.keys().collect::<Vec<_>>(), ["a"]);
        assert_eq!(
            config.manifest().unwrap()["content_scripts"],
            json!([{ "matches": ["https://x.com/*"], "js": ["a.js"] }])
        );
    }

    #[test]
    fn background_adds_service_worker() {
        let options = AssemblerOptions::default();
        let config = ConfigAssembler::new(&options)
            .assemble(&layout(false, true), &manifest(), &[])
            .unwrap();

        assert_eq!(config.entry["background"], PathBuf::from("/p/background/index.ts"));
        assert_eq!(
            config.manifest().unwrap()["background"]["service_worker"],
            "background.js"
        );
        assert!(config.manifest().unwrap().get("action").is_none());
    }

    #[test]
    fn shim_rules_precede_catch_all() {
        let options = AssemblerOptions::default();
        let config = ConfigAssembler::new(&options)
            .assemble(&layout(true, true), &manifest(), &[])
            .unwrap();

        let popup_rule = config.rule_for("/p/popup/popup.tsx").unwrap();
        assert!(popup_rule.loaders[1].loader.ends_with("reactMountLoader.js"));

        let content_rule = config.rule_for("/p/contents/a.ts").unwrap();
        assert!(content_rule.loaders[1].loader.ends_with("importReactLoader.js"));

        let plain = config.rule_for("/p/background/index.ts").unwrap();
        assert_eq!(plain.loaders.len(), 1);
        assert_eq!(plain.loaders[0].loader, "babel-loader");

        let style = config.rule_for("/p/popup/popup.scss").unwrap();
        assert_eq!(style.loaders[2].loader, "sass-loader");

        assert!(config.rule_for("/p/node_modules/react/index.js").is_none());
        // Only the popup file name, not every file in the popup directory.
        assert_eq!(config.rule_for("/p/popup/Button.tsx").unwrap().loaders.len(), 1);
    }

    #[test]
    fn shim_rules_are_anchored_at_the_project_root() {
        let options = AssemblerOptions::default();
        let mut layout = layout(true, true);
        layout.root = PathBuf::from("/home/u/contents/ext");
        let config = ConfigAssembler::new(&options)
            .assemble(&layout, &manifest(), &[])
            .unwrap();

        let loaders = |path: &str| -> Vec<String> {
            config
                .rule_for(path)
                .unwrap()
                .loaders
                .iter()
                .map(|l| l.loader.clone())
                .collect()
        };

        assert_eq!(loaders("/home/u/contents/ext/background/index.ts"), ["babel-loader"]);
        assert_eq!(loaders("/home/u/contents/ext/lib/util.ts"), ["babel-loader"]);
        assert!(loaders("/home/u/contents/ext/contents/a.ts")[1].ends_with("importReactLoader.js"));
        assert!(loaders("/home/u/contents/ext/popup/popup.tsx")[1].ends_with("reactMountLoader.js"));
        // A popup.tsx outside the popup convention is an ordinary script.
        assert_eq!(loaders("/home/u/contents/ext/lib/popup.tsx"), ["babel-loader"]);
        assert_eq!(loaders("/home/u/contents/ext/contents/nested/popup/popup.tsx").len(), 2);
        assert!(
            loaders("/home/u/contents/ext/contents/nested/popup/popup.tsx")[1].ends_with("importReactLoader.js")
        );
    }

    #[test]
    fn path_pattern_accepts_either_separator() {
        let re = regex::Regex::new(&format!("^{}$", path_pattern(Path::new("/p/my.ext/contents")))).unwrap();
        assert!(re.is_match("/p/my.ext/contents"));
        assert!(re.is_match("\\p\\my.ext\\contents"));
        assert!(!re.is_match("/p/myxext/contents"));
    }

    #[test]
    fn development_mode_sets_devtool_and_out_dir() {
        let options = AssemblerOptions::default().with_mode(crate::options::BuildMode::Development);
        let config = ConfigAssembler::new(&options)
            .assemble(&layout(false, false), &manifest(), &[])
            .unwrap();
        assert_eq!(config.devtool.as_deref(), Some("inline-source-map"));
        assert_eq!(config.output.path, PathBuf::from("/p/.xtensio/dev"));
        assert_eq!(config.output.filename, "[name].js");
    }

    #[test]
    fn html_plugin_is_scoped_to_popup() {
        let options = AssemblerOptions::default();
        let config = ConfigAssembler::new(&options)
            .assemble(&layout(true, false), &manifest(), &[])
            .unwrap();
        assert!(config.plugins.contains(&PluginConfig::Html {
            chunks: vec!["popup".to_string()],
            filename: "popup.html".to_string(),
        }));
    }
}
