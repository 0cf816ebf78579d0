//! Trip planner over a multi-line rail timetable.
//!
//! This module answers "how do I get from A to B": the fastest direct
//! trains, and itineraries with one (or, when no single line serves the
//! pair, two) changes of line.
//!
//! Planning runs in stages:
//! 1. prune stations that cannot lie on an origin → destination path
//! 2. classify lines by how they carry the two endpoints
//! 3. build direct trips, then transfer itineraries
//! 4. drop transfers that are not faster than the fastest direct trip

mod classify;
mod collector;
mod config;
mod direct;
mod double_transfer;
mod itinerary;
mod leg_timing;
mod rank;
mod reachability;
mod schedule;
mod transfer;


pub use config::PlannerConfig;
pub use leg_timing::{LegTiming, resolve_between, resolve_by_name, resolve_leg_timing};
pub use reachability::{ReachableStations, reachable_stations};
pub use schedule::{Planner, Query};
