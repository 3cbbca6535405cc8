use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

/// Answers whether a process id still refers to an observable process.
pub trait LivenessCheck: Send + Sync {
    fn is_alive(&self, pid: u32) -> bool;
}

/// Checks with the null signal: no signal is delivered, only the existence
/// and permission checks run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalLiveness;

impl LivenessCheck for SignalLiveness {
    fn is_alive(&self, pid: u32) -> bool {
        let Ok(raw) = i32::try_from(pid) else {
            return false;
        };
        // pid 0 and negative values address process groups
        if raw <= 0 {
            return false;
        }
        kill(Pid::from_raw(raw), None::<Signal>).is_ok()
    }
}
