pub mod job;
pub mod planner;
pub mod tracker;
pub mod walltime;

pub use job::{read_job_properties, ClusterDescriptor, JobDescriptor, Resources};
pub use planner::{plan, SubmissionPlan};
pub use tracker::{BatchTracker, Observation};
