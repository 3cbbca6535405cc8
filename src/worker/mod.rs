//! Cluster submission of stabilized batches.
//!
//! A batch is split into one contiguous chunk per planned node. Each chunk
//! becomes a single scheduler call whose allocation runs the chunk's job
//! scripts through a fan-out launcher, `tasks_per_node` at a time.
//!
//! # Execution Flow
//!
//! 1. [`partition_jobs`] splits the ordered job list
//! 2. [`BatchSubmitter::build_command`] renders one `srun ... parallel ...` call per chunk
//! 3. [`BatchSubmitter::submit`] launches every call concurrently and joins them all
//!
//! Exit statuses are logged only; failed submissions are not retried.

pub mod submitter;

pub use submitter::{partition_jobs, BatchSubmitter, SubmissionResult};
