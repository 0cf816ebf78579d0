//! The in-memory timetable index.
//!
//! A `Timetable` is built once (usually by [`load_dir`]) and is read-only
//! afterwards. Planner queries borrow it; the server shares it behind an
//! `Arc`.

mod error;
pub mod files;
mod load;

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Track, TrackId};

pub use error::LoadError;
pub use load::{load_dir, track_from_file};

/// All lines of the network, keyed by line id.
///
/// Tracks are kept in a `BTreeMap` so every traversal visits them in the
/// same order, which keeps planner output stable across runs.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    tracks: BTreeMap<TrackId, Track>,
    station_names: BTreeSet<String>,
}

impl Timetable {
    /// Build an index from a set of tracks.
    ///
    /// A later track with the same id replaces an earlier one.
    pub fn new(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut map = BTreeMap::new();
        for track in tracks {
            map.insert(track.id(), track);
        }

        let station_names = map
            .values()
            .flat_map(|t| t.stations().iter().map(|s| s.name.clone()))
            .collect();

        Self {
            tracks: map,
            station_names,
        }
    }

    /// Tracks in id order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Every station name served by any track, sorted.
    pub fn station_names(&self) -> &BTreeSet<String> {
        &self.station_names
    }

    pub fn contains_station(&self, name: &str) -> bool {
        self.station_names.contains(name)
    }
}
