//! Planner configuration.

/// Limits that bound every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Maximum number of direct solutions to return.
    pub max_direct_results: usize,

    /// Maximum number of transfer solutions to return.
    pub max_transfer_results: usize,

    /// Working-set size (as a multiple of `max_transfer_results`) that
    /// triggers pruning during enumeration.
    pub prune_trigger_factor: usize,

    /// Working-set size (as a multiple of `max_transfer_results`) kept
    /// after pruning.
    pub prune_keep_factor: usize,

    /// Maximum wait at a transfer station (minutes).
    /// Longer connections are discarded.
    pub max_wait_mins: u32,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_direct_results: usize,
        max_transfer_results: usize,
        prune_trigger_factor: usize,
        prune_keep_factor: usize,
        max_wait_mins: u32,
    ) -> Self {
        Self {
            max_direct_results,
            max_transfer_results,
            prune_trigger_factor,
            prune_keep_factor,
            max_wait_mins,
        }
    }

    /// Candidate count above which the working set is pruned.
    pub fn prune_trigger(&self) -> usize {
        self.max_transfer_results * self.prune_trigger_factor
    }

    /// Candidate count retained by a prune.
    pub fn prune_keep(&self) -> usize {
        (self.max_transfer_results * self.prune_keep_factor).max(1)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_direct_results: 500,
            max_transfer_results: 500,
            prune_trigger_factor: 4,
            prune_keep_factor: 2,
            max_wait_mins: 180, // 3 hours
        }
    }
}
