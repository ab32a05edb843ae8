//! End-to-end assembly against synthetic projects.

mod common;

use std::path::PathBuf;

use common::{FAIL_MARKER, FakeToolchain, Project};
use serde_json::json;
use xtensio_config::{AssembleError, Assembler, AssemblerOptions, BuildMode};

const MANIFEST: &str = r#"{ "name": "demo", "version": "1.0.0", "manifest_version": 3 }"#;

fn assembler(toolchain: std::sync::Arc<FakeToolchain>) -> Assembler {
    Assembler::new(AssemblerOptions::default(), toolchain).unwrap()
}

#[tokio::test]
async fn popup_only_project() {
    let project = Project::new()
        .manifest(MANIFEST)
        .file("popup/popup.tsx", "export default () => null;");

    let build = assembler(FakeToolchain::new()).assemble(project.root()).await.unwrap();
    let config = &build.config;

    assert_eq!(config.entry.len(), 1);
    assert_eq!(config.entry["popup"], project.root().join("popup/popup.tsx"));

    let manifest = config.manifest().unwrap();
    assert_eq!(manifest["action"]["default_popup"], "popup.html");
    assert!(manifest.get("background").is_none());
    assert_eq!(manifest["content_scripts"], json!([]));
}

#[tokio::test]
async fn only_content_scripts_with_matches_are_registered() {
    let project = Project::new()
        .manifest(MANIFEST)
        .file("contents/a.ts", r#"{ "matches": ["https://x.com/*"], "component": { "name": "Banner" } }"#)
        .file("contents/b.ts", r#"{ "matches": [] }"#);

    let build = assembler(FakeToolchain::new()).assemble(project.root()).await.unwrap();

    assert_eq!(build.config.entry.keys().collect::<Vec<_>>(), ["a"]);
    assert_eq!(build.config.entry["a"], project.root().join("contents/a.ts"));
    assert_eq!(
        build.config.manifest().unwrap()["content_scripts"],
        json!([{ "matches": ["https://x.com/*"], "js": ["a.js"] }])
    );
    assert_eq!(build.content_scripts.len(), 1);
    assert_eq!(build.content_scripts[0].component.as_deref(), Some("Banner"));
}

#[tokio::test]
async fn missing_contents_directory_means_no_content_scripts() {
    let project = Project::new()
        .manifest(MANIFEST)
        .file("background/index.ts", "chrome.runtime.onInstalled.addListener(() => {});");

    let build = assembler(FakeToolchain::new()).assemble(project.root()).await.unwrap();

    assert!(!build.layout.has_content_dir);
    assert_eq!(build.config.entry.keys().collect::<Vec<_>>(), ["background"]);
    assert_eq!(build.config.manifest().unwrap()["content_scripts"], json!([]));
}

#[tokio::test]
async fn content_script_order_follows_listing_not_completion() {
    let project = Project::new()
        .manifest(MANIFEST)
        .file("contents/alpha.ts", r#"{ "matches": ["https://a.com/*"], "delayMs": 120 }"#)
        .file("contents/beta.ts", r#"{ "matches": ["https://b.com/*"], "delayMs": 60 }"#)
        .file("contents/gamma.ts", r#"{ "matches": ["https://c.com/*"], "delayMs": 0 }"#);

    let build = assembler(FakeToolchain::new()).assemble(project.root()).await.unwrap();

    let scripts: Vec<_> = build.config.manifest().unwrap()["content_scripts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["js"][0].as_str().unwrap().to_string())
        .collect();
    assert_eq!(scripts, ["alpha.js", "beta.js", "gamma.js"]);
}

#[tokio::test]
async fn manifest_compile_failure_stops_before_content_scripts() {
    let project = Project::new()
        .manifest(FAIL_MARKER)
        .file("contents/a.ts", r#"{ "matches": ["https://x.com/*"] }"#);

    let toolchain = FakeToolchain::new();
    let err = assembler(toolchain.clone()).assemble(project.root()).await.unwrap_err();

    assert!(matches!(err, AssembleError::Compile { .. }));
    assert_eq!(toolchain.compiled(), vec![project.root().join("manifest.ts")]);
    assert!(!project.root().join(".xtensio/tmp").exists());
}

#[tokio::test]
async fn content_compile_failure_fails_the_build_after_joining() {
    let project = Project::new()
        .manifest(MANIFEST)
        .file("contents/a.ts", FAIL_MARKER)
        .file("contents/b.ts", r#"{ "matches": ["https://x.com/*"], "delayMs": 50 }"#);

    let toolchain = FakeToolchain::new();
    let err = assembler(toolchain.clone()).assemble(project.root()).await.unwrap_err();

    assert!(matches!(err, AssembleError::Compile { ref source_path, .. } if source_path.ends_with("contents/a.ts")));
    // Both branches ran to completion before the scratch directory was cleared.
    assert_eq!(toolchain.compiled().len(), 3);
    assert!(!project.root().join(".xtensio/tmp").exists());
}

#[tokio::test]
async fn missing_manifest_is_an_error() {
    let project = Project::new().file("popup/popup.tsx", "");

    let err = assembler(FakeToolchain::new()).assemble(project.root()).await.unwrap_err();
    assert!(matches!(err, AssembleError::ManifestNotFound { .. }));
}

#[tokio::test]
async fn malformed_descriptor_fails_fast() {
    let project = Project::new()
        .manifest(MANIFEST)
        .file("contents/a.ts", r#"{ "matches": "https://x.com/*" }"#);

    let err = assembler(FakeToolchain::new()).assemble(project.root()).await.unwrap_err();
    assert!(matches!(err, AssembleError::InvalidDescriptor { field: "matches", .. }));
}

#[tokio::test]
async fn shared_basenames_do_not_collide() {
    // contents/manifest.ts and ./manifest.ts both compile to manifest.js.
    let project = Project::new()
        .manifest(MANIFEST)
        .file("contents/manifest.ts", r#"{ "matches": ["https://x.com/*"] }"#);

    let build = assembler(FakeToolchain::new()).assemble(project.root()).await.unwrap();

    let manifest = build.config.manifest().unwrap();
    assert_eq!(manifest["name"], "demo");
    assert_eq!(manifest["content_scripts"][0]["js"], json!(["manifest.js"]));
}

#[tokio::test]
async fn assembling_twice_is_idempotent() {
    let project = Project::new()
        .manifest(MANIFEST)
        .file("popup/popup.tsx", "")
        .file("background/index.ts", "")
        .file("contents/a.ts", r#"{ "matches": ["https://x.com/*"], "shadowRoot": true }"#);

    let assembler = assembler(FakeToolchain::new());
    let first = assembler.assemble(project.root()).await.unwrap();
    let second = assembler.assemble(project.root()).await.unwrap();

    assert_eq!(first.config, second.config);
    assert_eq!(
        serde_json::to_string(&first.config).unwrap(),
        serde_json::to_string(&second.config).unwrap()
    );
}

#[tokio::test]
async fn stale_scratch_output_is_cleared_first() {
    let project = Project::new()
        .manifest(MANIFEST)
        .file(".xtensio/tmp/leftover/manifest.js", r#"{ "name": "stale" }"#);

    let build = assembler(FakeToolchain::new()).assemble(project.root()).await.unwrap();
    assert_eq!(build.config.manifest().unwrap()["name"], "demo");
    assert!(!project.root().join(".xtensio/tmp").exists());
}

#[tokio::test]
async fn json_manifest_and_custom_layout() {
    let project = Project::new()
        .file("manifest.json", MANIFEST)
        .file("src/ui/main.tsx", "")
        .file("src/inject/a.ts", r#"{ "matches": ["<all_urls>"] }"#);

    let mut options = AssemblerOptions::default().with_mode(BuildMode::Development);
    options.conventions.popup = PathBuf::from("src/ui/main");
    options.conventions.contents_dir = PathBuf::from("src/inject");
    options.out_dir = Some(PathBuf::from("out"));

    let toolchain = FakeToolchain::new();
    let build = Assembler::new(options, toolchain.clone())
        .unwrap()
        .assemble(project.root())
        .await
        .unwrap();

    assert_eq!(build.config.entry["popup"], project.root().join("src/ui/main.tsx"));
    assert_eq!(build.config.entry["a"], project.root().join("src/inject/a.ts"));
    assert_eq!(build.config.output.path, project.root().join("out"));
    assert_eq!(build.config.devtool.as_deref(), Some("inline-source-map"));
    // The JSON manifest is never handed to the compiler.
    assert_eq!(toolchain.compiled(), vec![project.root().join("src/inject/a.ts")]);
    assert!(build.config.rule_for(project.root().join("src/ui/main.tsx")).unwrap().loaders[1]
        .loader
        .ends_with("reactMountLoader.js"));
}
