//! Lines ("tracks") and the train runs scheduled on them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{ClockTime, Station, StationId};

/// Line identifier as issued by the timetable source (`cityTrackId`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

impl fmt::Debug for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrackId({})", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One scheduled stop of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopEvent {
    pub station: StationId,
    /// `None` when the run passes without stopping, or the source time was
    /// unusable.
    pub time: Option<ClockTime>,
}

impl StopEvent {
    pub fn new(station: StationId, time: Option<ClockTime>) -> Self {
        Self { station, time }
    }
}

/// One scheduled traversal of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainRun {
    /// Run name, e.g. "S4731". May be empty.
    pub name: String,
    /// Stop events in line order.
    pub stops: Vec<StopEvent>,
}

impl TrainRun {
    pub fn new(name: impl Into<String>, stops: Vec<StopEvent>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            stops,
        }
    }
}

/// A linear line with its stations and runs.
///
/// Stations are held sorted by position. Lookup tables are built once at
/// construction.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    name: String,
    stations: Vec<Station>,
    runs: Vec<TrainRun>,
    index_by_id: HashMap<StationId, usize>,
    index_by_name: HashMap<String, usize>,
}

impl Track {
    /// Build a track. Stations are sorted by position.
    pub fn new(
        id: TrackId,
        name: impl Into<String>,
        mut stations: Vec<Station>,
        runs: Vec<TrainRun>,
    ) -> Self {
        stations.sort_by_key(|s| s.position);

        let mut index_by_id = HashMap::with_capacity(stations.len());
        let mut index_by_name = HashMap::with_capacity(stations.len());
        for (i, station) in stations.iter().enumerate() {
            index_by_id.insert(station.id, i);
            index_by_name.insert(station.name.clone(), i);
        }

        Self {
            id,
            name: name.into(),
            stations,
            runs,
            index_by_id,
            index_by_name,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stations in position order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn runs(&self) -> &[TrainRun] {
        &self.runs
    }

    pub fn station_by_id(&self, id: StationId) -> Option<&Station> {
        self.index_by_id.get(&id).map(|&i| &self.stations[i])
    }

    pub fn station_by_name(&self, name: &str) -> Option<&Station> {
        self.index_by_name.get(name).map(|&i| &self.stations[i])
    }

    /// The station at `position`, if the line has one there.
    pub fn station_at(&self, position: i32) -> Option<&Station> {
        self.stations
            .binary_search_by_key(&position, |s| s.position)
            .ok()
            .map(|i| &self.stations[i])
    }

    /// Position of the named station on this line.
    pub fn position_of(&self, name: &str) -> Option<i32> {
        self.station_by_name(name).map(|s| s.position)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_by_name.contains_key(name)
    }
}
