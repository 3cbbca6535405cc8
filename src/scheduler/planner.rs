use chrono::TimeDelta;

use crate::error::{BatchError, Result};
use crate::scheduler::job::JobDescriptor;
use crate::scheduler::walltime::format_wall_time;

/// Jobs shorter than this many minutes are overbooked onto the same slot.
const OVERBOOKING_WINDOW_MINUTES: u64 = 30;

/// Safety margin on top of the serialized run time of one task slot.
const WALL_TIME_BUFFER: f64 = 1.1;

/// How a stabilized batch is laid out on the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub partition: String,
    pub num_nodes: usize,
    pub tasks_per_node: usize,
    /// Wall time per node allocation, `HH:MM:SS`
    pub proc_time: String,
    pub overbooking: u64,
}

/// Compute the submission plan for `num_jobs` jobs shaped like `job`.
///
/// Each node runs as many concurrent jobs as both its cores and memory
/// allow. Jobs shorter than half an hour are overbooked so a slot works
/// through several of them within one allocation.
pub fn plan(job: &JobDescriptor, num_jobs: usize) -> Result<SubmissionPlan> {
    let cluster = &job.cluster;
    let threads = u64::from(job.threads);
    let mem = job.resources.mem;
    let time = job.resources.time;

    if num_jobs == 0 {
        return Err(BatchError::InvalidResources("empty batch".to_string()));
    }
    if threads == 0 {
        return Err(invalid(job, "threads must be at least 1"));
    }
    if mem == 0 {
        return Err(invalid(job, "memory request must be positive"));
    }
    if time == 0 {
        return Err(invalid(job, "time estimate must be positive"));
    }

    let by_cores = u64::from(cluster.cores) / threads;
    let by_mem = cluster.mem / mem;
    let tasks_per_node = usize::try_from(by_cores.min(by_mem))
        .map_err(|_| invalid(job, "node capacity out of range"))?;
    if tasks_per_node == 0 {
        return Err(invalid(
            job,
            &format!(
                "job needs {} threads / {} mem but a {} node has {} cores / {} mem",
                threads, mem, cluster.partition, cluster.cores, cluster.mem
            ),
        ));
    }

    let overbooking = (OVERBOOKING_WINDOW_MINUTES / time).max(1);
    let slots = tasks_per_node as u64 * overbooking;
    let num_nodes = (num_jobs as u64).div_ceil(slots) as usize;

    let minutes = time as f64 * overbooking as f64 * WALL_TIME_BUFFER;
    let proc_time = TimeDelta::try_seconds((minutes * 60.0).round() as i64)
        .ok_or_else(|| invalid(job, "time estimate out of range"))?;

    match cluster.max_wall_time() {
        Ok(max) if proc_time > max => {
            tracing::warn!(
                rule = %job.rule,
                partition = %cluster.partition,
                proc_time = %format_wall_time(proc_time),
                max_time = %cluster.time,
                "Planned wall time exceeds partition limit"
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(rule = %job.rule, error = %e, "Could not check partition wall time limit");
        }
    }

    let plan = SubmissionPlan {
        partition: cluster.partition.clone(),
        num_nodes,
        tasks_per_node,
        proc_time: format_wall_time(proc_time),
        overbooking,
    };

    tracing::info!(
        rule = %job.rule,
        job_time = time,
        partition = %plan.partition,
        num_nodes = plan.num_nodes,
        tasks_per_node = plan.tasks_per_node,
        proc_time = %plan.proc_time,
        overbooking = plan.overbooking,
        "Computed submission plan"
    );

    Ok(plan)
}

fn invalid(job: &JobDescriptor, reason: &str) -> BatchError {
    BatchError::InvalidResources(format!("rule {}: {}", job.rule, reason))
}
