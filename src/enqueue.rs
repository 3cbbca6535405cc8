use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{BatchError, Result};
use crate::scheduler::read_job_properties;

/// Copy a job script into `<script_folder>/<rule>/` for the daemon to batch.
///
/// This is the cluster-submit hook the workflow engine calls once per job.
/// The copy is staged under a hidden name and renamed into place, so the
/// poller never counts a half-written script. Returns the path of the
/// queued copy.
pub async fn enqueue_job_script(script_folder: &Path, jobscript: &Path) -> Result<PathBuf> {
    let job = read_job_properties(jobscript).await?;
    let file_name = jobscript
        .file_name()
        .ok_or_else(|| BatchError::InvalidJobScript(jobscript.to_path_buf()))?;

    let rule_dir = script_folder.join(&job.rule);
    tokio::fs::create_dir_all(&rule_dir).await?;

    let target = rule_dir.join(file_name);
    let mut staging_name = OsString::from(".");
    staging_name.push(file_name);
    staging_name.push(".tmp");
    let staging = rule_dir.join(staging_name);

    tokio::fs::copy(jobscript, &staging).await?;
    if let Err(e) = tokio::fs::rename(&staging, &target).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }

    tracing::info!(rule = %job.rule, jobscript = %jobscript.display(), target = %target.display(), "Queued job script");
    Ok(target)
}
