//! Per-attempt scratch directories.

use crate::defaults::SCRATCH_PREFIX;
use crate::error::Result;
use std::path::Path;
use tempfile::TempDir;

/// Uniquely named temporary directory owned by one backend attempt.
///
/// Dropping it removes the directory and everything in it, including on
/// early returns and panics. `release` does the same but logs a failed
/// removal instead of ignoring it.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create `pcmforge-{purpose}-XXXXXX` under `root`, or the system temp dir.
    pub fn create(purpose: &str, root: Option<&Path>) -> Result<Self> {
        let prefix = format!("{}{}-", SCRATCH_PREFIX, purpose);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        tracing::trace!(path = %dir.path().display(), "Created scratch directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::warn!(path = %path.display(), error = %e, "Failed to clean up scratch directory");
        }
    }
}
