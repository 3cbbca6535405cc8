use std::collections::HashMap;

/// What one poll observation means for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// No pending jobs; nothing recorded
    Empty,
    /// Rule seen for the first time; tracking starts at zero
    FirstSighting,
    /// More jobs than last cycle
    Accumulating,
    /// Fewer jobs than tracked; the tracked count is kept
    Shrunk,
    /// Same non-zero count as last cycle; ready to submit
    Stable,
}

/// Per-rule pending-job counts across poll cycles.
///
/// A batch is stable once two consecutive observations report the same
/// non-zero count, so jobs still being written by the workflow engine are
/// not submitted early.
#[derive(Debug, Default)]
pub struct BatchTracker {
    counts: HashMap<String, usize>,
}

impl BatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `rule` currently has `num_jobs` pending job scripts.
    pub fn observe(&mut self, rule: &str, num_jobs: usize) -> Observation {
        if num_jobs == 0 {
            return Observation::Empty;
        }

        let Some(tracked) = self.counts.get(rule).copied() else {
            self.counts.insert(rule.to_string(), 0);
            tracing::debug!(rule, num_jobs, "Started tracking rule");
            return Observation::FirstSighting;
        };

        if num_jobs > tracked {
            self.counts.insert(rule.to_string(), num_jobs);
            tracing::debug!(rule, num_jobs, "Batch still accumulating");
            Observation::Accumulating
        } else if num_jobs == tracked {
            Observation::Stable
        } else {
            Observation::Shrunk
        }
    }

    /// Forget the submitted batch so the next one accumulates from zero.
    pub fn reset(&mut self, rule: &str) {
        if let Some(tracked) = self.counts.get_mut(rule) {
            *tracked = 0;
        }
    }

    pub fn tracked(&self, rule: &str) -> Option<usize> {
        self.counts.get(rule).copied()
    }
}
