//! Content script registration.
//!
//! Every script directly inside the contents directory is compiled and loaded
//! concurrently. Results come back in listing order no matter which compile
//! finishes first, because the manifest's `content_scripts` order is visible to
//! the browser.

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};

use crate::compiler::ScriptCompiler;
use crate::descriptor::ContentScriptDescriptor;
use crate::discovery::ProjectLayout;
use crate::error::Result;
use crate::options::ProjectConventions;

pub struct ContentScriptRegistrar {
    compiler: ScriptCompiler,
    conventions: ProjectConventions,
    concurrency: usize,
}

impl ContentScriptRegistrar {
    pub fn new(compiler: ScriptCompiler, conventions: ProjectConventions, concurrency: usize) -> Self {
        Self {
            compiler,
            conventions,
            concurrency: concurrency.max(1),
        }
    }

    /// Descriptors for every eligible content script, in listing order.
    ///
    /// Every file is compiled even when an earlier one fails, so no compile is
    /// still writing into the scratch directory when this returns. The first
    /// failure in listing order is reported.
    pub async fn register(&self, layout: &ProjectLayout) -> Result<Vec<ContentScriptDescriptor>> {
        if !layout.has_content_dir {
            return Ok(Vec::new());
        }

        let files = list_content_files(&layout.contents_dir, &self.conventions).await?;
        tracing::debug!(
            "registering {} content script(s) from {}",
            files.len(),
            layout.contents_dir.display()
        );

        let results: Vec<Result<ContentScriptDescriptor>> = stream::iter(files)
            .map(|file| self.describe(file))
            .buffered(self.concurrency)
            .collect()
            .await;

        let descriptors = results.into_iter().collect::<Result<Vec<_>>>()?;

        Ok(descriptors
            .into_iter()
            .filter(|descriptor| {
                let eligible = descriptor.is_eligible();
                if !eligible {
                    tracing::debug!(
                        "skipping {}: no match patterns declared",
                        descriptor.source.display()
                    );
                }
                eligible
            })
            .collect())
    }

    async fn describe(&self, source: PathBuf) -> Result<ContentScriptDescriptor> {
        let module = self.compiler.compile_and_load(&source).await?;
        ContentScriptDescriptor::from_export(&source, &module.value)
    }
}

/// Script files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. Files without a script extension, and
/// entries whose metadata can't be read (dangling symlinks), are skipped with a
/// warning.
pub async fn list_content_files(dir: &Path, conventions: &ProjectConventions) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!("ignoring unreadable entry in contents: {} ({err})", path.display());
                continue;
            }
        }
        if conventions.is_script(&path) {
            files.push(path);
        } else {
            tracing::warn!("ignoring non-script file in contents: {}", path.display());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn lists_scripts_sorted_and_flat() {
        let dir = TempDir::new().unwrap();
        let contents = dir.path();
        fs::write(contents.join("zeta.ts"), "").unwrap();
        fs::write(contents.join("alpha.tsx"), "").unwrap();
        fs::write(contents.join("styles.css"), "").unwrap();
        fs::create_dir_all(contents.join("nested")).unwrap();
        fs::write(contents.join("nested/inner.ts"), "").unwrap();

        let files = list_content_files(contents, &ProjectConventions::default()).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["alpha.tsx", "zeta.ts"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_symlink_is_skipped() {
        let dir = TempDir::new().unwrap();
        let contents = dir.path();
        fs::write(contents.join("real.ts"), "").unwrap();
        std::os::unix::fs::symlink(contents.join("gone.ts"), contents.join("broken.ts")).unwrap();
        std::os::unix::fs::symlink(contents.join("real.ts"), contents.join("linked.ts")).unwrap();

        let files = list_content_files(contents, &ProjectConventions::default()).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["linked.ts", "real.ts"]);
    }
}
