//! Same-line trips with no change of train.

use std::collections::BTreeSet;

use tracing::trace;

use crate::domain::{ClockTime, Track, TrackId};
use crate::timetable::Timetable;

use super::config::PlannerConfig;
use super::itinerary::TimedLeg;
use super::leg_timing::resolve_between;
use super::rank::{nearest_departure, rank_directs};

/// Every run that carries a passenger from `from` to `to` without a
/// change, unranked.
///
/// Only lines that list `from` before `to` are considered. When `restrict`
/// is given, only those lines are searched.
pub(crate) fn direct_legs(
    timetable: &Timetable,
    from: &str,
    to: &str,
    restrict: Option<&BTreeSet<TrackId>>,
) -> Vec<TimedLeg> {
    let tracks: Vec<&Track> = match restrict {
        Some(ids) => ids.iter().filter_map(|&id| timetable.track(id)).collect(),
        None => timetable.tracks().collect(),
    };

    let mut legs = Vec::new();
    for track in tracks {
        let (Some(board), Some(alight)) = (track.station_by_name(from), track.station_by_name(to))
        else {
            continue;
        };
        if board.position >= alight.position {
            continue;
        }

        for run in track.runs() {
            let Some(timing) = resolve_between(track, run, board, alight) else {
                continue;
            };
            if let Some(leg) = TimedLeg::from_timing(track.id(), &run.name, from, to, timing) {
                legs.push(leg);
            }
        }
    }
    legs
}

/// Direct trips from `from` to `to`.
///
/// With a target time the result is the single run departing soonest at
/// or after it (or nothing). Otherwise runs are ranked by arrival,
/// deduplicated and capped at `max_direct_results`.
pub(crate) fn build_direct(
    timetable: &Timetable,
    config: &PlannerConfig,
    from: &str,
    to: &str,
    restrict: Option<&BTreeSet<TrackId>>,
    target: Option<ClockTime>,
) -> Vec<TimedLeg> {
    let legs = direct_legs(timetable, from, to, restrict);
    trace!(from, to, candidates = legs.len(), "direct candidates");

    match target {
        Some(target) => nearest_departure(&legs, target).cloned().into_iter().collect(),
        None => rank_directs(legs, config.max_direct_results),
    }
}
