use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::error::PlotResult;

/// Polls a file's modification time so cooperating plot processes can
/// react when a shared file is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFile {
    watched: Option<(PathBuf, SystemTime)>,
}

impl SyncFile {
    /// Starts watching `path`. An empty path never reports a change.
    pub fn new(path: impl AsRef<Path>) -> PlotResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(Self { watched: None });
        }
        let modified = fs::metadata(path)?.modified()?;
        Ok(Self {
            watched: Some((path.to_path_buf(), modified)),
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.watched.as_ref().map(|(path, _)| path.as_path())
    }

    /// Whether the modification time differs from the previous poll.
    pub fn is_modified(&mut self) -> PlotResult<bool> {
        let Some((path, last)) = self.watched.as_mut() else {
            return Ok(false);
        };
        let modified = fs::metadata(&*path)?.modified()?;
        let changed = modified != *last;
        *last = modified;
        if changed {
            debug!(path = %path.display(), "sync file modified");
        }
        Ok(changed)
    }
}
