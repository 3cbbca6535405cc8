pub mod cleanup;
pub mod config;
pub mod daemon;
pub mod enqueue;
pub mod error;
pub mod liveness;
pub mod lock;
pub mod poller;
pub mod scheduler;
pub mod worker;
