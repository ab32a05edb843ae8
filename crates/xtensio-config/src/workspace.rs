//! Scratch directory for compiled manifest and content modules.
//!
//! Each compiled source gets its own arena below the scratch root, named by a
//! BLAKE3 hash of the source path. Two content files that share a basename in
//! different directories therefore never write to the same output file, and
//! concurrent compiles need no coordination.

use std::io;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

/// Length of the hex prefix used for arena directory names.
const ARENA_NAME_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the scratch directory and everything in it.
    ///
    /// A missing directory is not an error.
    pub async fn clear(&self) -> io::Result<()> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                tracing::debug!("cleared scratch directory {}", self.root.display());
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Arena directory for one source file. Stable across builds.
    pub fn arena_for(&self, source: &Path) -> PathBuf {
        self.root.join(arena_name(source))
    }

    /// Create the arena for `source` and return its path.
    pub async fn prepare_arena(&self, source: &Path) -> io::Result<PathBuf> {
        let arena = self.arena_for(source);
        tokio::fs::create_dir_all(&arena).await?;
        Ok(arena)
    }
}

fn arena_name(source: &Path) -> String {
    let normalized = source.to_path_buf().clean();
    let hash = blake3::hash(normalized.as_os_str().as_encoded_bytes());
    let mut hex = hash.to_hex().to_string();
    hex.truncate(ARENA_NAME_LEN);
    hex
}
