//! Leg timing resolution.
//!
//! Decides whether one run carries a passenger between two stations of its
//! line, and when. Both the direct and transfer builders go through
//! [`resolve_leg_timing`], so the direction and stop-order rules live here
//! only.

use crate::domain::{
    ClockTime, Direction, Station, StationId, Track, TrainRun, rollover_arrival,
};

/// Departure and arrival of one run between two stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegTiming {
    pub depart: ClockTime,
    pub arrive: ClockTime,
    /// Departure in minutes since midnight.
    pub depart_min: u32,
    /// Arrival in minutes since the departure's midnight; exceeds a day
    /// when the leg runs past midnight.
    pub arrive_min: u32,
}

impl LegTiming {
    pub fn duration(&self) -> u32 {
        self.arrive_min - self.depart_min
    }
}

/// Resolve the timing of `run` from `board` to `alight`.
///
/// Returns `None` unless:
/// - the run stops (with a usable time) at `board`, and later at `alight`;
/// - `board_pos` and `alight_pos` differ and agree with the stations'
///   positions on the line;
/// - every stop event from boarding to alighting strictly advances in
///   that direction, and all of them are stations of this line.
pub fn resolve_leg_timing(
    track: &Track,
    run: &TrainRun,
    board: StationId,
    alight: StationId,
    board_pos: i32,
    alight_pos: i32,
) -> Option<LegTiming> {
    let stops = &run.stops;

    let depart_idx = stops
        .iter()
        .position(|s| s.station == board && s.time.is_some())?;
    let arrive_idx = depart_idx
        + 1
        + stops[depart_idx + 1..]
            .iter()
            .position(|s| s.station == alight && s.time.is_some())?;

    let direction = Direction::between(board_pos, alight_pos)?;

    let depart_station = track.station_by_id(board)?;
    let arrive_station = track.station_by_id(alight)?;
    if !direction.advances(depart_station.position, arrive_station.position) {
        return None;
    }

    let mut prev = depart_station.position;
    for stop in &stops[depart_idx + 1..=arrive_idx] {
        let position = track.station_by_id(stop.station)?.position;
        if !direction.advances(prev, position) {
            return None;
        }
        prev = position;
    }

    let depart = stops[depart_idx].time?;
    let arrive = stops[arrive_idx].time?;

    Some(LegTiming {
        depart,
        arrive,
        depart_min: depart.minutes(),
        arrive_min: rollover_arrival(depart, arrive),
    })
}

/// Resolve a leg between two stations of `track`.
pub fn resolve_between(
    track: &Track,
    run: &TrainRun,
    from: &Station,
    to: &Station,
) -> Option<LegTiming> {
    resolve_leg_timing(track, run, from.id, to.id, from.position, to.position)
}

/// Resolve a leg between two stations of `track` given by name.
pub fn resolve_by_name(track: &Track, run: &TrainRun, from: &str, to: &str) -> Option<LegTiming> {
    let from = track.station_by_name(from)?;
    let to = track.station_by_name(to)?;
    resolve_between(track, run, from, to)
}
