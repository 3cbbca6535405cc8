use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the cluster submission command.
///
/// Every chunk of a batch becomes one `srun` call that hands its job scripts
/// to GNU `parallel` inside a single-node allocation.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Cluster scheduler binary (e.g. "srun")
    pub scheduler: String,
    /// Fan-out launcher run inside the allocation
    pub launcher: String,
    /// Value passed as `--cpus-per-task`
    pub cpus_per_task: u32,
    /// Value passed as `--job-name`
    pub job_name: String,
    /// Partition name that carries GPUs
    pub gpu_partition: String,
    /// GPUs requested via `--gres` on the GPU partition
    pub gpus_per_node: u32,
    /// Log commands instead of running them
    pub dry_run: bool,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            scheduler: "srun".to_string(),
            launcher: "parallel".to_string(),
            cpus_per_task: 24,
            job_name: "Snakemake".to_string(),
            gpu_partition: "gpus".to_string(),
            gpus_per_node: 4,
            dry_run: false,
        }
    }
}

impl SubmitConfig {
    pub fn is_gpu_partition(&self, partition: &str) -> bool {
        partition == self.gpu_partition
    }
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Root of the job-script tree, one subdirectory per rule
    pub script_folder: PathBuf,
    /// Marker file guarding against a second daemon instance
    pub lock_file: PathBuf,
    pub poll_interval: Duration,
    pub submit: SubmitConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            script_folder: PathBuf::from("scripts"),
            lock_file: PathBuf::from("jobscript_master.lock"),
            poll_interval: Duration::from_secs(10),
            submit: SubmitConfig::default(),
        }
    }
}

impl DaemonConfig {
    pub fn new(script_folder: impl Into<PathBuf>) -> Self {
        Self {
            script_folder: script_folder.into(),
            ..Default::default()
        }
    }

    pub fn with_lock_file(mut self, lock_file: impl Into<PathBuf>) -> Self {
        self.lock_file = lock_file.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_submit(mut self, submit: SubmitConfig) -> Self {
        self.submit = submit;
        self
    }
}
