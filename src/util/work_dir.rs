//! A directory that only lives as long as the processing of one mod.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Working directory removed together with its contents when dropped.
///
/// Leftovers of an earlier, interrupted run at the same path are removed on
/// creation.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// Create an empty working directory at `path`.
    ///
    /// # Errors
    /// - If an existing directory at `path` cannot be removed
    /// - If the directory cannot be created
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if path.exists() {
            tracing::warn!("Removing leftover working directory {}", path.display());
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    /// Get the path of the working directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        if let Err(err) = fs::remove_dir_all(&self.path) {
            tracing::error!(
                "Could not remove working directory {}: {err}",
                self.path.display()
            );
        }
    }
}
