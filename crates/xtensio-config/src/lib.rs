//! Bundler configuration assembly for xtensio browser-extension projects.
//!
//! Given a project laid out by convention (`manifest.ts`, `popup/popup.tsx`,
//! `background/index.ts`, `contents/*`), this crate discovers which surfaces
//! exist, compiles the manifest and every content script with an external
//! TypeScript compiler, reads their exports, and emits a [`BuildConfig`] for
//! the bundler together with the merged extension manifest.
//!
//! # Example
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use xtensio_config::{AssemblerOptions, BuildMode, assemble_project};
//!
//! let options = AssemblerOptions::default().with_mode(BuildMode::Development);
//! let build = assemble_project(Path::new("my-extension"), options).await?;
//! println!("{}", serde_json::to_string_pretty(&build.config)?);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod build_config;
pub mod compiler;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod options;
pub mod registrar;
pub mod toolchain;
pub mod workspace;

pub use assembler::{AssembledBuild, Assembler, ConfigAssembler, assemble_project};
pub use build_config::{BuildConfig, LoaderSpec, OutputOptions, PluginConfig, TransformRule};
pub use compiler::{CompiledModule, ScriptCompiler};
pub use descriptor::ContentScriptDescriptor;
pub use discovery::{ProjectDiscovery, ProjectLayout};
pub use error::{AssembleError, Result};
pub use manifest::{FragmentSource, Manifest, ManifestFragment, ManifestMerge};
pub use options::{AssemblerOptions, BuildMode, ProjectConventions, ShimLoaders};
pub use registrar::ContentScriptRegistrar;
pub use toolchain::{NodeToolchain, Toolchain};
pub use workspace::Workspace;
