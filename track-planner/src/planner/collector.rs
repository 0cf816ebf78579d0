//! Memory-bounded accumulation of transfer itineraries.

use tracing::trace;

use super::config::PlannerConfig;
use super::itinerary::Itinerary;
use super::rank::{Ranked, compare_for_pruning, rank_itineraries};

/// Collects itineraries, pruning to the fastest ones whenever the working
/// set grows past the configured trigger.
#[derive(Debug)]
pub(crate) struct BoundedCollector {
    entries: Vec<Ranked>,
    trigger: usize,
    keep: usize,
    next_seq: u64,
    fastest: Option<u32>,
}

impl BoundedCollector {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            entries: Vec::new(),
            trigger: config.prune_trigger(),
            keep: config.prune_keep(),
            next_seq: 0,
            fastest: None,
        }
    }

    pub fn push(&mut self, itinerary: Itinerary) {
        let total = itinerary.total_minutes();
        self.fastest = Some(self.fastest.map_or(total, |f| f.min(total)));

        self.entries.push(Ranked {
            seq: self.next_seq,
            itinerary,
        });
        self.next_seq += 1;

        if self.entries.len() > self.trigger {
            self.prune();
        }
    }

    /// Shortest total duration seen so far, including pruned entries.
    pub fn fastest(&self) -> Option<u32> {
        self.fastest
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn prune(&mut self) {
        let before = self.entries.len();
        if self.keep < before {
            self.entries
                .select_nth_unstable_by(self.keep, compare_for_pruning);
            self.entries.truncate(self.keep);
        }
        trace!(before, after = self.entries.len(), "pruned transfer candidates");
    }

    /// Surviving entries, unranked.
    pub fn into_entries(self) -> Vec<Ranked> {
        self.entries
    }

    /// Rank, deduplicate and cap the collected itineraries.
    pub fn finish(self, cap: usize) -> Vec<Itinerary> {
        rank_itineraries(self.entries, cap)
    }
}
