use crate::config::DaemonConfig;
use crate::error::Result;
use crate::liveness::LivenessCheck;
use crate::lock::LockMarker;
use crate::poller::RulePoller;

/// How a daemon run ended. Both outcomes are successful exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonExit {
    /// Another instance holds the lock marker; nothing was started
    AlreadyRunning,
    /// The parent process ended and the lock marker was released
    ParentExited,
}

/// Run the batching daemon for as long as `parent_pid` is alive.
///
/// The lock marker brackets the whole run. When it is already present the
/// function returns at once and leaves the marker alone.
pub async fn run_daemon<P: LivenessCheck>(
    config: DaemonConfig,
    parent_pid: u32,
    liveness: P,
) -> Result<DaemonExit> {
    let Some(lock) = LockMarker::acquire(&config.lock_file)? else {
        return Ok(DaemonExit::AlreadyRunning);
    };

    tracing::info!(
        parent_pid,
        lock_file = %lock.path().display(),
        script_folder = %config.script_folder.display(),
        dry_run = config.submit.dry_run,
        "Batching daemon is running"
    );

    let mut poller = RulePoller::new(config, liveness);
    poller.run(parent_pid).await;

    lock.release()?;
    Ok(DaemonExit::ParentExited)
}
