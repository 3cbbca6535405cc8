use std::path::Path;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::{BatchError, Result};
use crate::scheduler::walltime::parse_wall_time;

/// Prefix of the line in a job script that carries its JSON properties.
const PROPERTIES_PREFIX: &str = "# properties = ";

/// Resources a single job requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub gpus: u32,
    /// Memory per job, same unit as [`ClusterDescriptor::mem`]
    pub mem: u64,
    /// Expected run time in minutes
    pub time: u64,
}

/// Capacity of one node in the targeted partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDescriptor {
    pub partition: String,
    pub cores: u32,
    #[serde(default)]
    pub gpus: u32,
    pub mem: u64,
    /// Maximum wall time per allocation, `HH:MM:SS`
    pub time: String,
}

impl ClusterDescriptor {
    pub fn max_wall_time(&self) -> Result<TimeDelta> {
        parse_wall_time(&self.time)
    }
}

/// Metadata the workflow engine embeds in every job script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub rule: String,
    pub threads: u32,
    pub resources: Resources,
    pub cluster: ClusterDescriptor,
}

impl JobDescriptor {
    /// Extract the descriptor from the text of a job script.
    pub fn parse(path: &Path, script: &str) -> Result<Self> {
        let json = script
            .lines()
            .find_map(|line| line.strip_prefix(PROPERTIES_PREFIX))
            .ok_or_else(|| BatchError::MissingProperties(path.to_path_buf()))?;

        serde_json::from_str(json).map_err(|source| BatchError::InvalidProperties {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Read and parse the properties of the job script at `path`.
pub async fn read_job_properties(path: &Path) -> Result<JobDescriptor> {
    let script = tokio::fs::read_to_string(path).await?;
    JobDescriptor::parse(path, &script)
}
