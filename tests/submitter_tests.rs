
use std::path::PathBuf;

use rulebatch::config::SubmitConfig;
use rulebatch::scheduler::SubmissionPlan;
use rulebatch::worker::{partition_jobs, BatchSubmitter};
use tempfile::TempDir;
use test_harness::{read_log_lines, recording_scheduler};

fn test_plan(partition: &str, num_nodes: usize) -> SubmissionPlan {
    SubmissionPlan {
        partition: partition.to_string(),
        num_nodes,
        tasks_per_node: 6,
        proc_time: "00:33:00".to_string(),
        overbooking: 3,
    }
}

fn job_paths(n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| PathBuf::from(format!("scripts/fit/job{i}.sh")))
        .collect()
}

#[test]
fn test_partition_covers_every_job_once_in_order() {
    for total in 1..60 {
        let jobs: Vec<usize> = (0..total).collect();
        for num_nodes in 1..12 {
            let chunks = partition_jobs(&jobs, num_nodes);
            let flattened: Vec<usize> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
            assert_eq!(flattened, jobs);

            let size = total.div_ceil(num_nodes);
            assert!(chunks.len() <= num_nodes);
            assert!(chunks.iter().all(|c| c.len() <= size && !c.is_empty()));
            assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == size));
        }
    }
}

#[test]
fn test_partition_uneven_tail() {
    let jobs: Vec<u32> = (0..10).collect();
    let chunks = partition_jobs(&jobs, 4);
    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![3, 3, 3, 1]);
}

#[test]
fn test_partition_empty_and_zero_nodes() {
    let empty: Vec<u32> = Vec::new();
    assert!(partition_jobs(&empty, 3).is_empty());

    let jobs = vec![1, 2, 3];
    assert_eq!(partition_jobs(&jobs, 0), vec![&jobs[..]]);
}

#[test]
fn test_build_command_cpu_partition() {
    let submitter = BatchSubmitter::new(SubmitConfig::default());
    let jobs = job_paths(2);

    let args = submitter.build_command(&test_plan("batch", 1), &jobs);

    assert_eq!(
        args,
        vec![
            "srun",
            "-n",
            "1",
            "--cpu_bind=none",
            "--cpus-per-task=24",
            "--job-name=Snakemake",
            "--nodes=1",
            "--ntasks=1",
            "--partition=batch",
            "--time=00:33:00",
            "parallel",
            "--jobs",
            "6",
            "/bin/bash",
            "{1}",
            ":::",
            "scripts/fit/job0.sh",
            "scripts/fit/job1.sh",
        ]
    );
}

#[test]
fn test_build_command_gpu_partition_requests_gpus() {
    let submitter = BatchSubmitter::new(SubmitConfig::default());
    let args = submitter.build_command(&test_plan("gpus", 1), &job_paths(1));

    let gres = args.iter().position(|a| a == "--gres=gpu:4").expect("gres flag");
    let time = args.iter().position(|a| a == "--time=00:33:00").unwrap();
    assert!(gres < time);
    assert!(args.contains(&"--partition=gpus".to_string()));
}

#[test]
fn test_build_command_uses_configured_values() {
    let config = SubmitConfig {
        scheduler: "/opt/slurm/bin/srun".to_string(),
        launcher: "/usr/bin/parallel".to_string(),
        cpus_per_task: 48,
        job_name: "dmri".to_string(),
        gpu_partition: "booster".to_string(),
        gpus_per_node: 2,
        dry_run: false,
    };
    let submitter = BatchSubmitter::new(config);
    let args = submitter.build_command(&test_plan("booster", 1), &job_paths(1));

    assert_eq!(args[0], "/opt/slurm/bin/srun");
    assert!(args.contains(&"--cpus-per-task=48".to_string()));
    assert!(args.contains(&"--job-name=dmri".to_string()));
    assert!(args.contains(&"--gres=gpu:2".to_string()));
    assert!(args.contains(&"/usr/bin/parallel".to_string()));
}

#[tokio::test]
async fn test_submit_runs_one_command_per_chunk() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("calls.log");
    let scheduler = recording_scheduler(dir.path(), &log, 0);

    let submitter = BatchSubmitter::new(SubmitConfig {
        scheduler: scheduler.display().to_string(),
        ..SubmitConfig::default()
    });
    let jobs = job_paths(5);

    let results = submitter.submit(&test_plan("batch", 2), &jobs).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk, 0);
    assert_eq!(results[0].num_jobs, 3);
    assert_eq!(results[1].num_jobs, 2);
    assert!(results.iter().all(|r| r.succeeded()));

    // Barrier: every invocation has finished by the time submit returns
    let lines = read_log_lines(&log);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(
        "::: scripts/fit/job0.sh scripts/fit/job1.sh scripts/fit/job2.sh"
    ));
    assert!(lines[1].ends_with("::: scripts/fit/job3.sh scripts/fit/job4.sh"));
    assert!(lines[0].starts_with("-n 1 --cpu_bind=none --cpus-per-task=24"));
}

#[tokio::test]
async fn test_submit_reports_failures_without_retry() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("calls.log");
    let scheduler = recording_scheduler(dir.path(), &log, 3);

    let submitter = BatchSubmitter::new(SubmitConfig {
        scheduler: scheduler.display().to_string(),
        ..SubmitConfig::default()
    });

    let results = submitter.submit(&test_plan("batch", 3), &job_paths(3)).await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.exit_code == Some(3)));
    assert!(results.iter().all(|r| !r.succeeded()));
    assert_eq!(read_log_lines(&log).len(), 3);
}

#[tokio::test]
async fn test_submit_missing_scheduler_is_reported() {
    let submitter = BatchSubmitter::new(SubmitConfig {
        scheduler: "nonexistent_scheduler_12345".to_string(),
        ..SubmitConfig::default()
    });

    let results = submitter.submit(&test_plan("batch", 1), &job_paths(2)).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].exit_code.is_none());
    assert!(results[0].error.is_some());
}

#[tokio::test]
async fn test_dry_run_spawns_nothing() {
    let submitter = BatchSubmitter::new(SubmitConfig {
        scheduler: "nonexistent_scheduler_12345".to_string(),
        dry_run: true,
        ..SubmitConfig::default()
    });

    let results = submitter.submit(&test_plan("batch", 2), &job_paths(4)).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.succeeded()));
}
