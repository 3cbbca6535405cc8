use std::path::{Path, PathBuf};

use crate::cleanup::clean_batch;
use crate::config::DaemonConfig;
use crate::error::{BatchError, Result};
use crate::liveness::LivenessCheck;
use crate::scheduler::{plan, read_job_properties, BatchTracker, Observation, SubmissionPlan};
use crate::worker::{BatchSubmitter, SubmissionResult};

/// A batch that was handed to the cluster during a poll cycle.
#[derive(Debug)]
pub struct BatchReport {
    pub rule: String,
    pub plan: SubmissionPlan,
    pub results: Vec<SubmissionResult>,
}

/// A rule whose stabilized batch could not be submitted this cycle.
///
/// Its jobs stay on disk and the tracker keeps its count, so the batch is
/// looked at again next cycle.
#[derive(Debug)]
pub struct RuleFailure {
    pub rule: String,
    pub error: BatchError,
}

/// Everything that happened to the rules during one poll cycle.
#[derive(Debug, Default)]
pub struct PollCycle {
    pub batches: Vec<BatchReport>,
    pub failures: Vec<RuleFailure>,
}

/// Watches the job-script tree and submits each rule's batch once it stops
/// growing.
pub struct RulePoller<P> {
    config: DaemonConfig,
    liveness: P,
    tracker: BatchTracker,
    submitter: BatchSubmitter,
}

impl<P: LivenessCheck> RulePoller<P> {
    pub fn new(config: DaemonConfig, liveness: P) -> Self {
        let submitter = BatchSubmitter::new(config.submit.clone());
        Self {
            config,
            liveness,
            tracker: BatchTracker::new(),
            submitter,
        }
    }

    pub fn tracker(&self) -> &BatchTracker {
        &self.tracker
    }

    /// Poll until `parent_pid` is gone.
    ///
    /// A cycle that cannot list the job-script tree is logged and abandoned.
    pub async fn run(&mut self, parent_pid: u32) {
        tracing::info!(
            parent_pid,
            script_folder = %self.config.script_folder.display(),
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "Rule poller started"
        );

        while self.liveness.is_alive(parent_pid) {
            tokio::time::sleep(self.config.poll_interval).await;

            if let Err(e) = self.poll_once().await {
                tracing::error!(error = %e, "Poll cycle failed");
            }
        }

        tracing::info!(parent_pid, "Parent process ended, stopping poller");
    }

    /// Run one poll cycle over every rule directory.
    ///
    /// A rule that fails is recorded in [`PollCycle::failures`] and does not
    /// keep the remaining rules from being polled.
    pub async fn poll_once(&mut self) -> Result<PollCycle> {
        let Some(rules) = list_entries(&self.config.script_folder, EntryKind::Dir).await? else {
            // Workflow engine has not emitted anything yet
            return Ok(PollCycle::default());
        };

        let mut cycle = PollCycle::default();
        for rule_dir in rules {
            let rule = rule_name(&rule_dir);
            match self.poll_rule(&rule, &rule_dir).await {
                Ok(Some(report)) => cycle.batches.push(report),
                Ok(None) => {}
                Err(error) => {
                    tracing::error!(rule = %rule, error = %error, "Rule batch failed");
                    cycle.failures.push(RuleFailure { rule, error });
                }
            }
        }
        Ok(cycle)
    }

    async fn poll_rule(&mut self, rule: &str, rule_dir: &Path) -> Result<Option<BatchReport>> {
        let jobs = list_entries(rule_dir, EntryKind::File).await?.unwrap_or_default();

        match self.tracker.observe(rule, jobs.len()) {
            Observation::Stable => {}
            Observation::Shrunk => {
                tracing::debug!(
                    rule,
                    num_jobs = jobs.len(),
                    tracked = ?self.tracker.tracked(rule),
                    "Pending jobs dropped below tracked count"
                );
                return Ok(None);
            }
            Observation::Empty | Observation::FirstSighting | Observation::Accumulating => {
                return Ok(None);
            }
        }

        tracing::info!(rule, num_jobs = jobs.len(), "Batch stabilized");

        let job = read_job_properties(&jobs[0]).await?;
        let plan = plan(&job, jobs.len())?;
        let results = self.submitter.submit(&plan, &jobs).await;

        clean_batch(&mut self.tracker, rule, &jobs).await?;

        Ok(Some(BatchReport {
            rule: rule.to_string(),
            plan,
            results,
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
}

/// Sorted entries of `dir` of the given kind, or `None` if `dir` is missing.
///
/// Dot-files are skipped; writers stage job scripts under a hidden name and
/// rename them into place once complete.
async fn list_entries(dir: &Path, kind: EntryKind) -> Result<Option<Vec<PathBuf>>> {
    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry.file_type().await?;
        let wanted = match kind {
            EntryKind::Dir => file_type.is_dir(),
            EntryKind::File => !file_type.is_dir(),
        };
        if wanted {
            entries.push(entry.path());
        }
    }
    entries.sort();
    Ok(Some(entries))
}

fn rule_name(rule_dir: &Path) -> String {
    rule_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
