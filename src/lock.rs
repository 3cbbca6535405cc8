use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Marker file that keeps a second daemon from running in the same
/// working directory.
///
/// Presence of the file is authoritative. The pid written into it is only
/// there for whoever finds a stale marker.
#[derive(Debug)]
pub struct LockMarker {
    path: PathBuf,
}

impl LockMarker {
    /// Create the marker exclusively.
    ///
    /// Returns `Ok(None)` when the marker already exists; callers treat that
    /// as "another instance is running" and exit successfully. Never waits.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::info!(lock_file = %path.display(), "Lock marker present, another instance is running");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        writeln!(file, "locked by process id: {}", std::process::id())?;
        tracing::debug!(lock_file = %path.display(), "Lock acquired");

        Ok(Some(Self {
            path: path.to_path_buf(),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the marker. Only the normal termination path calls this.
    pub fn release(self) -> Result<()> {
        std::fs::remove_file(&self.path)?;
        tracing::debug!(lock_file = %self.path.display(), "Lock released");
        Ok(())
    }
}
