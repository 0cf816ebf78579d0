//! Metro trip planner.
//!
//! Loads line timetables from a data directory and answers "how do I get
//! from this station to that one": direct trains first, then itineraries
//! with one or two changes that beat them. Results are served over HTTP
//! and cached in memory and on disk.

pub mod cache;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod logging;
pub mod planner;
pub mod timetable;
pub mod web;
