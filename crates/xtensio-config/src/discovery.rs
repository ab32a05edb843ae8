//! Surface discovery for an extension project.
//!
//! Finds which optional surfaces a project has by probing conventional paths.
//! Nothing is parsed here and nothing fails: a missing file is just `false`.

use std::path::{Path, PathBuf};

use crate::options::ProjectConventions;

/// Facts about one project, computed fresh for every build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,

    /// Popup entry that was found, or the first candidate that was tried.
    pub popup: PathBuf,
    pub has_popup: bool,

    /// Background entry that was found, or the first candidate that was tried.
    pub background: PathBuf,
    pub has_background: bool,

    pub contents_dir: PathBuf,
    pub has_content_dir: bool,

    /// Manifest source, if any candidate exists. Required by the assembler.
    pub manifest: Option<PathBuf>,
}

/// Probes a project root against a set of [`ProjectConventions`].
///
/// # Example
///
/// ```no_run
/// use xtensio_config::{ProjectConventions, ProjectDiscovery};
///
/// let layout = ProjectDiscovery::new(ProjectConventions::default()).discover("my-extension");
/// if layout.has_popup {
///     println!("popup entry: {}", layout.popup.display());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectDiscovery {
    conventions: ProjectConventions,
}

impl ProjectDiscovery {
    pub fn new(conventions: ProjectConventions) -> Self {
        Self { conventions }
    }

    pub fn conventions(&self) -> &ProjectConventions {
        &self.conventions
    }

    pub fn discover(&self, root: impl AsRef<Path>) -> ProjectLayout {
        let root = root.as_ref().to_path_buf();
        let extensions = &self.conventions.script_extensions;

        let (popup, has_popup) = probe(&root, &self.conventions.popup, extensions);
        let (background, has_background) = probe(&root, &self.conventions.background, extensions);

        let contents_dir = root.join(&self.conventions.contents_dir);
        let has_content_dir = contents_dir.is_dir();

        let manifest_exts: Vec<String> = extensions
            .iter()
            .cloned()
            .chain(std::iter::once("json".to_string()))
            .collect();
        let (manifest, has_manifest) = probe(&root, &self.conventions.manifest, &manifest_exts);

        let layout = ProjectLayout {
            root,
            popup,
            has_popup,
            background,
            has_background,
            contents_dir,
            has_content_dir,
            manifest: has_manifest.then_some(manifest),
        };

        tracing::debug!(
            popup = layout.has_popup,
            background = layout.has_background,
            contents = layout.has_content_dir,
            manifest = layout.manifest.is_some(),
            "discovered project surfaces in {}",
            layout.root.display()
        );

        layout
    }
}

/// Try `stem.<ext>` for each extension in order.
///
/// Returns the first existing file, or the first candidate when none exist.
fn probe(root: &Path, stem: &Path, extensions: &[String]) -> (PathBuf, bool) {
    let base = root.join(stem);
    let candidates: Vec<PathBuf> = extensions
        .iter()
        .map(|ext| with_appended_extension(&base, ext))
        .collect();

    match candidates.iter().find(|candidate| candidate.is_file()) {
        Some(found) => (found.clone(), true),
        None => (candidates.into_iter().next().unwrap_or(base), false),
    }
}

// `Path::with_extension` would replace a dotted stem like `popup.page`.
fn with_appended_extension(base: &Path, ext: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
