//! Session-private scratch directory for preview renders

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

const PREFIX: &str = "audio_preview_";
pub(crate) const PREVIEW_PREFIX: &str = "preview_";
pub(crate) const PREVIEW_EXTENSION: &str = "wav";

/// A uniquely named directory under a temp root, removed on [`close`].
///
/// Dropping without closing still removes the directory (errors ignored).
///
/// [`close`]: ScratchArea::close
#[derive(Debug)]
pub struct ScratchArea {
    root: PathBuf,
    path: PathBuf,
    dir: Option<TempDir>,
    keep: bool,
}

impl ScratchArea {
    /// Create a fresh scratch directory inside `root` (created if missing).
    pub fn create(root: &Path) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .rand_bytes(8)
            .tempdir_in(root)?;
        let path = dir.path().to_path_buf();
        debug!("Scratch directory: {}", path.display());

        Ok(Self {
            root: root.to_path_buf(),
            path,
            dir: Some(dir),
            keep: false,
        })
    }

    /// Leave the directory on disk when closed
    pub fn keep_on_close(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The temp root this area was created in; outlives [`close`](Self::close).
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_closed(&self) -> bool {
        self.dir.is_none()
    }

    /// Recreate the directory if something removed it.
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.path)
    }

    /// Preview files currently present, in no particular order
    pub fn previews(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.path) else {
            return Vec::new();
        };
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| is_preview_file(path))
            .collect()
    }

    /// Delete old preview files. Failures are logged and skipped.
    pub fn prune_previews(&self) {
        for path in self.previews() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Could not remove old preview {}: {}", path.display(), e);
            }
        }
    }

    /// Remove the directory. Safe to call more than once; never fails.
    pub fn close(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        if self.keep {
            // Forgetting the handle skips its removal on drop.
            std::mem::forget(dir);
            debug!("Scratch files kept at: {}", self.path.display());
            return;
        }

        match dir.close() {
            Ok(()) => debug!("Removed scratch directory {}", self.path.display()),
            Err(e) => warn!("Could not remove scratch directory {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for ScratchArea {
    fn drop(&mut self) {
        self.close();
    }
}

fn is_preview_file(path: &Path) -> bool {
    let name_matches = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(PREVIEW_PREFIX));
    let ext_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PREVIEW_EXTENSION));
    name_matches && ext_matches
}
