//! Query orchestration.
//!
//! Runs reachability pruning, line classification and the route builders
//! for one query, then applies the final domination filter.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{ClockTime, QueryResult};
use crate::timetable::Timetable;

use super::classify::TrackClassification;
use super::config::PlannerConfig;
use super::direct::build_direct;
use super::itinerary::{Itinerary, TimedLeg};
use super::reachability::reachable_stations;
use super::transfer::build_transfers;

/// A trip-planning request.
///
/// Origin and destination are station names. Callers check that they
/// differ and exist before planning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    pub origin: String,
    pub destination: String,
    /// Only offer first legs departing at or after this time.
    pub depart_after: Option<ClockTime>,
}

impl Query {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            depart_after: None,
        }
    }

    pub fn with_depart_after(mut self, time: ClockTime) -> Self {
        self.depart_after = Some(time);
        self
    }
}

/// Trip planner over a loaded timetable.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    timetable: &'a Timetable,
    config: &'a PlannerConfig,
}

impl<'a> Planner<'a> {
    pub fn new(timetable: &'a Timetable, config: &'a PlannerConfig) -> Self {
        Self { timetable, config }
    }

    /// Plan a query, stamping the result with the current time.
    pub fn compute(&self, query: &Query) -> QueryResult {
        self.compute_at(query, Utc::now())
    }

    /// Plan a query, stamping the result with `generated_at`.
    ///
    /// Output depends only on the timetable, the configuration and the
    /// arguments.
    pub fn compute_at(&self, query: &Query, generated_at: DateTime<Utc>) -> QueryResult {
        let origin = query.origin.as_str();
        let destination = query.destination.as_str();
        let target = query.depart_after;

        let reachable = reachable_stations(self.timetable, origin, destination);
        let classification =
            TrackClassification::classify(self.timetable.tracks(), origin, destination);

        let direct = build_direct(
            self.timetable,
            self.config,
            origin,
            destination,
            Some(&classification.direct),
            target,
        );

        let mut transfers = build_transfers(
            self.timetable,
            self.config,
            origin,
            destination,
            &reachable,
            &classification,
            target,
        );

        if let Some(fastest) = direct.iter().map(TimedLeg::duration).min() {
            transfers.retain(|it| it.total_minutes() < fastest);
        }

        debug!(
            origin,
            destination,
            reachable = reachable.len(),
            direct_lines = classification.direct.len(),
            reverse_lines = classification.reverse.len(),
            direct = direct.len(),
            transfers = transfers.len(),
            "planned query"
        );

        QueryResult {
            start: query.origin.clone(),
            end: query.destination.clone(),
            depart_time: target,
            direct: direct.iter().map(TimedLeg::to_direct).collect(),
            transfers: transfers.iter().map(Itinerary::to_solution).collect(),
            generated_at,
        }
    }
}
