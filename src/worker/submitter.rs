use std::path::PathBuf;
use std::process::ExitStatus;

use tokio::process::Command;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::config::SubmitConfig;
use crate::scheduler::SubmissionPlan;

/// Outcome of one per-node submission.
#[derive(Debug)]
pub struct SubmissionResult {
    pub chunk: usize,
    pub num_jobs: usize,
    pub exit_code: Option<i32>,
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && self.error.is_none()
    }
}

/// Split `jobs` into contiguous chunks of `ceil(len / num_nodes)`.
///
/// The last chunk may be shorter, and fewer than `num_nodes` chunks come
/// back when the division leaves nothing for the tail.
pub fn partition_jobs<T>(jobs: &[T], num_nodes: usize) -> Vec<&[T]> {
    if jobs.is_empty() {
        return Vec::new();
    }
    let chunk_size = jobs.len().div_ceil(num_nodes.max(1));
    jobs.chunks(chunk_size).collect()
}

/// Submits a stabilized batch as one scheduler invocation per node.
#[derive(Debug, Clone)]
pub struct BatchSubmitter {
    config: SubmitConfig,
}

impl BatchSubmitter {
    pub fn new(config: SubmitConfig) -> Self {
        Self { config }
    }

    /// Build the argument vector for one node's submission.
    pub fn build_command(&self, plan: &SubmissionPlan, jobs: &[PathBuf]) -> Vec<String> {
        let mut args = vec![
            self.config.scheduler.clone(),
            "-n".to_string(),
            "1".to_string(),
            "--cpu_bind=none".to_string(),
            format!("--cpus-per-task={}", self.config.cpus_per_task),
            format!("--job-name={}", self.config.job_name),
            "--nodes=1".to_string(),
            "--ntasks=1".to_string(),
            format!("--partition={}", plan.partition),
        ];

        if self.config.is_gpu_partition(&plan.partition) {
            args.push(format!("--gres=gpu:{}", self.config.gpus_per_node));
        }

        args.push(format!("--time={}", plan.proc_time));

        // Fan out inside the allocation
        args.push(self.config.launcher.clone());
        args.push("--jobs".to_string());
        args.push(plan.tasks_per_node.to_string());
        args.push("/bin/bash".to_string());
        args.push("{1}".to_string());
        args.push(":::".to_string());
        args.extend(jobs.iter().map(|j| j.display().to_string()));

        args
    }

    /// Submit every chunk concurrently and wait until all of them return.
    ///
    /// Exit statuses are reported but never acted upon; there is no retry and
    /// no timeout.
    pub async fn submit(&self, plan: &SubmissionPlan, jobs: &[PathBuf]) -> Vec<SubmissionResult> {
        let batch_id = Uuid::new_v4();
        let chunks = partition_jobs(jobs, plan.num_nodes);

        tracing::info!(
            batch_id = %batch_id,
            partition = %plan.partition,
            num_jobs = jobs.len(),
            num_chunks = chunks.len(),
            dry_run = self.config.dry_run,
            "Submitting batch"
        );

        let mut tasks = JoinSet::new();
        for (chunk, chunk_jobs) in chunks.into_iter().enumerate() {
            let args = self.build_command(plan, chunk_jobs);
            let num_jobs = chunk_jobs.len();
            let dry_run = self.config.dry_run;
            tasks.spawn(async move { Self::run_chunk(batch_id, chunk, num_jobs, args, dry_run).await });
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!(batch_id = %batch_id, error = %e, "Submission task panicked"),
            }
        }
        results.sort_by_key(|r| r.chunk);

        let failed = results.iter().filter(|r| !r.succeeded()).count();
        tracing::info!(batch_id = %batch_id, submitted = results.len(), failed, "Batch submission finished");

        results
    }

    async fn run_chunk(
        batch_id: Uuid,
        chunk: usize,
        num_jobs: usize,
        args: Vec<String>,
        dry_run: bool,
    ) -> SubmissionResult {
        let command_line = args.join(" ");
        tracing::info!(batch_id = %batch_id, chunk, num_jobs, command = %command_line, "Submitting node");

        if dry_run {
            return SubmissionResult {
                chunk,
                num_jobs,
                exit_code: Some(0),
                error: None,
            };
        }

        let Some((program, rest)) = args.split_first() else {
            return SubmissionResult {
                chunk,
                num_jobs,
                exit_code: None,
                error: Some("empty command".to_string()),
            };
        };

        let status = Command::new(program).args(rest).status().await;
        Self::process_status(batch_id, chunk, num_jobs, status)
    }

    fn process_status(
        batch_id: Uuid,
        chunk: usize,
        num_jobs: usize,
        status: Result<ExitStatus, std::io::Error>,
    ) -> SubmissionResult {
        match status {
            Ok(status) => {
                let exit_code = status.code();
                if status.success() {
                    tracing::info!(batch_id = %batch_id, chunk, "Node submission returned");
                } else {
                    tracing::warn!(
                        batch_id = %batch_id,
                        chunk,
                        exit_code = ?exit_code,
                        "Node submission failed, jobs are not retried"
                    );
                }
                SubmissionResult {
                    chunk,
                    num_jobs,
                    exit_code,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(batch_id = %batch_id, chunk, error = %e, "Failed to launch scheduler");
                SubmissionResult {
                    chunk,
                    num_jobs,
                    exit_code: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
