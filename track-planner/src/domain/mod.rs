//! Domain types for the trip planner.
//!
//! This module contains the timetable model (stations, tracks, runs), clock
//! time handling and the itinerary types the planner produces. Tracks build
//! their lookup tables at construction, so code that receives a `Track` can
//! query it without further validation.

mod direction;
mod solution;
mod station;
mod time;
mod track;

pub use direction::Direction;
pub use solution::{DirectSolution, QueryResult, TransferLeg, TransferSolution};
pub use station::{Station, StationId};
pub use time::{
    ClockTime, MINUTES_PER_DAY, NO_STOP, TimeError, format_duration, parse_stop_time,
    rollover_arrival,
};
pub use track::{StopEvent, Track, TrackId, TrainRun};
