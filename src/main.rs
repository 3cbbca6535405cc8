use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use rulebatch::config::{DaemonConfig, SubmitConfig};
use rulebatch::daemon::{run_daemon, DaemonExit};
use rulebatch::enqueue::enqueue_job_script;
use rulebatch::liveness::SignalLiveness;

#[derive(Parser, Debug)]
#[command(name = "rulebatch")]
#[command(version)]
#[command(about = "Batches workflow job scripts per rule and submits them to the cluster")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the batching daemon for as long as the workflow engine runs
    Master(MasterArgs),

    /// Queue one job script for batching (cluster-submit hook)
    Enqueue {
        /// Job script written by the workflow engine
        jobscript: PathBuf,

        /// Root of the per-rule job-script tree
        #[arg(long, default_value = "scripts")]
        script_folder: PathBuf,
    },
}

// =============================================================================
// Daemon Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct MasterArgs {
    /// Process id of the workflow engine; the daemon exits when it is gone
    parent_pid: u32,

    /// Root of the per-rule job-script tree
    #[arg(long, default_value = "scripts")]
    script_folder: PathBuf,

    /// Marker file preventing a second daemon instance
    #[arg(long, default_value = "jobscript_master.lock")]
    lock_file: PathBuf,

    /// Seconds between poll cycles
    #[arg(long, default_value = "10")]
    interval_secs: u64,

    // === Submission Options ===
    /// Cluster scheduler binary
    #[arg(long, default_value = "srun")]
    scheduler: String,

    /// Launcher that fans job scripts out inside an allocation
    #[arg(long, default_value = "parallel")]
    launcher: String,

    #[arg(long, default_value = "24")]
    cpus_per_task: u32,

    #[arg(long, default_value = "Snakemake")]
    job_name: String,

    /// Partition that receives a GPU request
    #[arg(long, default_value = "gpus")]
    gpu_partition: String,

    #[arg(long, default_value = "4")]
    gpus_per_node: u32,

    /// Log submission commands without running them
    #[arg(long)]
    dry_run: bool,
}

impl MasterArgs {
    fn into_config(self) -> (u32, DaemonConfig) {
        let submit = SubmitConfig {
            scheduler: self.scheduler,
            launcher: self.launcher,
            cpus_per_task: self.cpus_per_task,
            job_name: self.job_name,
            gpu_partition: self.gpu_partition,
            gpus_per_node: self.gpus_per_node,
            dry_run: self.dry_run,
        };
        let config = DaemonConfig::new(self.script_folder)
            .with_lock_file(self.lock_file)
            .with_poll_interval(Duration::from_secs(self.interval_secs))
            .with_submit(submit);
        (self.parent_pid, config)
    }
}

async fn run_master(args: MasterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (parent_pid, config) = args.into_config();

    tracing::info!("Batching daemon started");

    match run_daemon(config, parent_pid, SignalLiveness).await? {
        DaemonExit::AlreadyRunning => {
            eprintln!("Another instance is already running.");
        }
        DaemonExit::ParentExited => {
            tracing::info!("Batching daemon is terminating");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match args.command {
        Commands::Master(master_args) => {
            run_master(master_args).await?;
        }
        Commands::Enqueue {
            jobscript,
            script_folder,
        } => {
            enqueue_job_script(&script_folder, &jobscript).await?;
        }
    }

    Ok(())
}
