use chrono::TimeDelta;

use crate::error::{BatchError, Result};

/// Parse a Slurm-style `HH:MM:SS` wall time. Hours may exceed 24.
pub fn parse_wall_time(raw: &str) -> Result<TimeDelta> {
    let invalid = || BatchError::InvalidWallTime(raw.to_string());

    let mut parts = raw.trim().split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let hours: i64 = h.parse().map_err(|_| invalid())?;
    let minutes: i64 = m.parse().map_err(|_| invalid())?;
    let seconds: i64 = s.parse().map_err(|_| invalid())?;
    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(invalid());
    }

    hours
        .checked_mul(3600)
        .and_then(|s| s.checked_add(minutes * 60 + seconds))
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(invalid)
}

/// Format a wall time as `HH:MM:SS` without wrapping at 24 hours.
pub fn format_wall_time(time: TimeDelta) -> String {
    let total = time.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
