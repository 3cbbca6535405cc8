use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::scheduler::BatchTracker;

/// Delete a submitted batch's job scripts and reset the rule's count.
///
/// Runs whether or not the submissions succeeded. The count is reset
/// before any file is touched, and every file is attempted even after a
/// failure; the first error is returned. A file that is already gone is not
/// an error.
pub async fn clean_batch(tracker: &mut BatchTracker, rule: &str, jobs: &[PathBuf]) -> Result<()> {
    tracker.reset(rule);

    let mut first_error = None;
    let mut removed = 0;
    for job in jobs {
        match remove_job_script(job).await {
            Ok(()) => removed += 1,
            Err(e) => {
                tracing::warn!(rule, path = %job.display(), error = %e, "Failed to remove submitted job script");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    tracing::info!(rule, removed, total = jobs.len(), "Cleaned up submitted batch");
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn remove_job_script(path: &Path) -> Result<()> {
    tracing::debug!(path = %path.display(), "Removing job script");
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
