//! Two-change itineraries for pairs no single line serves.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::ClockTime;
use crate::timetable::Timetable;

use super::collector::BoundedCollector;
use super::config::PlannerConfig;
use super::direct::build_direct;
use super::itinerary::{DepartureBoard, Itinerary};
use super::reachability::ReachableStations;

/// Chain three direct legs through every ordered pair of distinct
/// reachable intermediate stations.
pub(crate) fn build_double_transfers(
    timetable: &Timetable,
    config: &PlannerConfig,
    origin: &str,
    destination: &str,
    reachable: &ReachableStations,
    target: Option<ClockTime>,
) -> Vec<Itinerary> {
    let intermediates: Vec<&str> = reachable
        .iter()
        .filter(|&s| s != origin && s != destination)
        .collect();

    let first: HashMap<&str, _> = intermediates
        .iter()
        .map(|&t1| (t1, build_direct(timetable, config, origin, t1, None, target)))
        .filter(|(_, legs)| !legs.is_empty())
        .collect();
    let last: HashMap<&str, _> = intermediates
        .iter()
        .map(|&t2| {
            let legs = build_direct(timetable, config, t2, destination, None, None);
            (t2, DepartureBoard::new(legs))
        })
        .filter(|(_, board)| !board.is_empty())
        .collect();

    let mut collector = BoundedCollector::new(config);
    let mut pairs = 0usize;

    for &t1 in &intermediates {
        let Some(first_legs) = first.get(t1) else {
            continue;
        };
        for &t2 in &intermediates {
            if t1 == t2 {
                continue;
            }
            let Some(last_legs) = last.get(t2) else {
                continue;
            };
            let middle = build_direct(timetable, config, t1, t2, None, None);
            if middle.is_empty() {
                continue;
            }
            pairs += 1;
            let middle = DepartureBoard::new(middle);

            for l1 in first_legs {
                for l2 in middle.connections(l1, config.max_wait_mins) {
                    let Some(two) = Itinerary::join(l1, l2, config.max_wait_mins, false) else {
                        continue;
                    };
                    let Some(arrived) = two.legs().last() else {
                        continue;
                    };
                    for l3 in last_legs.connections(arrived, config.max_wait_mins) {
                        if let Some(three) = two.then(l3, config.max_wait_mins) {
                            collector.push(three);
                        }
                    }
                }
            }
        }
    }

    debug!(
        origin,
        destination,
        pairs,
        candidates = collector.len(),
        "two-change candidates"
    );
    collector.finish(config.max_transfer_results)
}
