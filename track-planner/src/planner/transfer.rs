//! Itineraries with one change of line, plus the two-change fallback.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{ClockTime, Station, Track};
use crate::timetable::Timetable;

use super::classify::{TrackClassification, TrackRole};
use super::collector::BoundedCollector;
use super::config::PlannerConfig;
use super::double_transfer::build_double_transfers;
use super::itinerary::{DepartureBoard, Itinerary, TimedLeg};
use super::leg_timing::resolve_between;
use super::rank::{Ranked, nearest_departure, rank_itineraries};
use super::reachability::ReachableStations;

/// One line's way of covering one leg between two of its stations.
#[derive(Debug, Clone, Copy)]
struct LegCandidate<'a> {
    track: &'a Track,
    board: &'a Station,
    alight: &'a Station,
    role: TrackRole,
}

impl LegCandidate<'_> {
    fn resolve(&self) -> Vec<TimedLeg> {
        self.track
            .runs()
            .iter()
            .filter_map(|run| {
                let timing = resolve_between(self.track, run, self.board, self.alight)?;
                TimedLeg::from_timing(
                    self.track.id(),
                    &run.name,
                    &self.board.name,
                    &self.alight.name,
                    timing,
                )
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct TransferGroup<'a> {
    first: Vec<LegCandidate<'a>>,
    second: Vec<LegCandidate<'a>>,
}

/// Group leg candidates by the station where the change happens.
fn group_candidates<'a>(
    timetable: &'a Timetable,
    origin: &str,
    destination: &str,
    reachable: &ReachableStations,
) -> BTreeMap<&'a str, TransferGroup<'a>> {
    let mut groups: BTreeMap<&str, TransferGroup<'_>> = BTreeMap::new();

    for track in timetable.tracks() {
        let Some(role) = TrackRole::of(track, origin, destination) else {
            continue;
        };
        let origin_station = role.origin().and_then(|_| track.station_by_name(origin));
        let destination_station = role
            .destination()
            .and_then(|_| track.station_by_name(destination));

        for station in track.stations() {
            let name = station.name.as_str();
            if name == origin || name == destination || !reachable.contains(name) {
                continue;
            }

            if let Some(board) = origin_station.filter(|_| role.admits_first_leg(station.position)) {
                groups.entry(name).or_default().first.push(LegCandidate {
                    track,
                    board,
                    alight: station,
                    role,
                });
            }
            if let Some(alight) =
                destination_station.filter(|_| role.admits_second_leg(station.position))
            {
                groups.entry(name).or_default().second.push(LegCandidate {
                    track,
                    board: station,
                    alight,
                    role,
                });
            }
        }
    }

    groups
}

/// First legs into one transfer station, split by whether they ride a
/// line away from the destination.
///
/// With a target time the whole group collapses to its single soonest
/// departure, which then lands in whichever pool its line belongs to.
fn first_legs(group: &TransferGroup<'_>, target: Option<ClockTime>) -> (Vec<TimedLeg>, Vec<TimedLeg>) {
    let mut forward = Vec::new();
    let mut reverse = Vec::new();
    for candidate in &group.first {
        let legs = candidate.resolve();
        if candidate.role.is_reverse() {
            reverse.extend(legs);
        } else {
            forward.extend(legs);
        }
    }

    let Some(target) = target else {
        return (forward, reverse);
    };
    match nearest_departure(forward.iter().chain(&reverse), target).cloned() {
        // A line has one role, so a leg equal to a forward leg is forward.
        Some(leg) if forward.contains(&leg) => (vec![leg], Vec::new()),
        Some(leg) => (Vec::new(), vec![leg]),
        None => (Vec::new(), Vec::new()),
    }
}

/// Itineraries with exactly one change.
///
/// Boardings on lines that run away from the destination are only kept
/// when strictly faster than every itinerary that does not use one.
pub(crate) fn build_single_transfers(
    timetable: &Timetable,
    config: &PlannerConfig,
    origin: &str,
    destination: &str,
    reachable: &ReachableStations,
    target: Option<ClockTime>,
) -> Vec<Itinerary> {
    let groups = group_candidates(timetable, origin, destination, reachable);

    let mut plain = BoundedCollector::new(config);
    let mut via_reverse = BoundedCollector::new(config);

    for group in groups.values() {
        if group.first.is_empty() || group.second.is_empty() {
            continue;
        }

        let (forward, reverse) = first_legs(group, target);
        if forward.is_empty() && reverse.is_empty() {
            continue;
        }

        let mut all_second = Vec::new();
        let mut direct_line_second = Vec::new();
        for candidate in &group.second {
            let legs = candidate.resolve();
            if matches!(candidate.role, TrackRole::Direct { .. }) {
                direct_line_second.extend(legs.iter().cloned());
            }
            all_second.extend(legs);
        }
        let all_second = DepartureBoard::new(all_second);
        let direct_line_second = DepartureBoard::new(direct_line_second);

        for first in &forward {
            for second in all_second.connections(first, config.max_wait_mins) {
                if let Some(it) = Itinerary::join(first, second, config.max_wait_mins, false) {
                    plain.push(it);
                }
            }
        }
        for first in &reverse {
            for second in direct_line_second.connections(first, config.max_wait_mins) {
                if let Some(it) = Itinerary::join(first, second, config.max_wait_mins, true) {
                    via_reverse.push(it);
                }
            }
        }
    }

    let threshold = plain.fastest();
    let mut entries = plain.into_entries();
    let before_reverse = entries.len();
    entries.extend(
        via_reverse
            .into_entries()
            .into_iter()
            .filter(|e| threshold.is_none_or(|t| e.itinerary.total_minutes() < t)),
    );

    debug!(
        origin,
        destination,
        plain = before_reverse,
        via_reverse = entries.len() - before_reverse,
        "single-transfer candidates"
    );

    rank_itineraries(entries, config.max_transfer_results)
}

/// All transfer itineraries for a query.
///
/// Two-change itineraries are only searched when no line carries both
/// endpoints, and are only merged in when faster than the best one-change
/// itinerary.
pub(crate) fn build_transfers(
    timetable: &Timetable,
    config: &PlannerConfig,
    origin: &str,
    destination: &str,
    reachable: &ReachableStations,
    classification: &TrackClassification,
    target: Option<ClockTime>,
) -> Vec<Itinerary> {
    let single = build_single_transfers(timetable, config, origin, destination, reachable, target);
    if !classification.is_empty() {
        return single;
    }

    let double = build_double_transfers(timetable, config, origin, destination, reachable, target);
    if double.is_empty() {
        return single;
    }

    let best_single = single.iter().map(Itinerary::total_minutes).min();
    let faster: Vec<Itinerary> = double
        .into_iter()
        .filter(|it| best_single.is_none_or(|best| it.total_minutes() < best))
        .collect();
    debug!(origin, destination, merged = faster.len(), "two-change fallback");
    if faster.is_empty() {
        return single;
    }

    let entries = single
        .into_iter()
        .chain(faster)
        .enumerate()
        .map(|(seq, itinerary)| Ranked {
            seq: seq as u64,
            itinerary,
        })
        .collect();
    rank_itineraries(entries, config.max_transfer_results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StationId, StopEvent, TrackId, TrainRun};
    use crate::planner::reachability::reachable_stations;

    fn run(name: &str, stops: &[(u32, &str)]) -> TrainRun {
        TrainRun::new(
            name,
            stops
                .iter()
                .map(|(id, time)| StopEvent::new(StationId(*id), ClockTime::parse_hhmm(time).ok()))
                .collect(),
        )
    }

    fn track(id: u32, stations: &[(u32, &str, i32)], runs: Vec<TrainRun>) -> Track {
        Track::new(
            TrackId(id),
            format!("L{id}"),
            stations
                .iter()
                .map(|(sid, name, pos)| Station::new(StationId(*sid), *name, *pos))
                .collect(),
            runs,
        )
    }

    /// A -> M on line 1, M -> Z on line 2.
    fn two_lines() -> Timetable {
        Timetable::new(vec![
            track(
                1,
                &[(1, "A", 1), (2, "M", 2)],
                vec![
                    run("a1", &[(1, "08:00"), (2, "08:20")]),
                    run("a2", &[(1, "09:00"), (2, "09:20")]),
                ],
            ),
            track(
                2,
                &[(3, "M", 1), (4, "Z", 2)],
                vec![
                    run("b1", &[(3, "08:30"), (4, "08:50")]),
                    run("b2", &[(3, "12:30"), (4, "12:50")]),
                ],
            ),
        ])
    }

    fn transfers(tt: &Timetable, target: Option<ClockTime>) -> Vec<Itinerary> {
        let reachable = reachable_stations(tt, "A", "Z");
        let classification = TrackClassification::classify(tt.tracks(), "A", "Z");
        build_transfers(tt, &PlannerConfig::default(), "A", "Z", &reachable, &classification, target)
    }

    #[test]
    fn joins_within_wait_limit() {
        let tt = two_lines();
        let found = transfers(&tt, None);
        // a1 -> b1 (10 min wait) and a2 -> b2 (190 min wait, rejected)
        assert_eq!(found.len(), 1);
        let it = &found[0];
        assert_eq!(it.legs()[0].run_name, "a1");
        assert_eq!(it.legs()[1].run_name, "b1");
        assert_eq!(it.waits(), &[10]);
        assert_eq!(it.total_minutes(), 50);
    }

    #[test]
    fn target_time_collapses_first_leg() {
        let tt = two_lines();
        let found = transfers(&tt, ClockTime::from_hm(8, 30));
        // Only a2 departs after 08:30, and b2 is too far after it.
        assert!(found.is_empty());

        let found = transfers(&tt, ClockTime::from_hm(7, 0));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].legs()[0].run_name, "a1");
    }

    #[test]
    fn reverse_line_boarding_needs_direct_line_onwards() {
        // Line 1 lists Z before A, so riding it to R moves away from Z.
        // Line 2 carries Z but not A: it is not a direct line, so the
        // reverse boarding has nothing to continue on.
        let tt = Timetable::new(vec![
            track(
                1,
                &[(1, "Z", 1), (2, "A", 2), (3, "R", 3)],
                vec![run("r", &[(2, "08:00"), (3, "08:05")])],
            ),
            track(
                2,
                &[(4, "R", 1), (5, "Z", 2)],
                vec![run("d", &[(4, "08:10"), (5, "08:20")])],
            ),
        ]);
        assert!(transfers(&tt, None).is_empty());
    }

    #[test]
    fn reverse_line_combination_kept_when_faster() {
        // Line 1: Z(1) A(2) R(3), reverse for A -> Z.
        // Line 2: A(1) R(2) Z(3), direct for A -> Z.
        let tt = Timetable::new(vec![
            track(
                1,
                &[(1, "Z", 1), (2, "A", 2), (3, "R", 3)],
                vec![run("rev", &[(2, "08:00"), (3, "08:05")])],
            ),
            track(
                2,
                &[(4, "A", 1), (5, "R", 2), (6, "Z", 3)],
                vec![
                    run("slow", &[(4, "07:00"), (5, "07:50"), (6, "08:30")]),
                    run("onward", &[(5, "08:10"), (6, "08:20")]),
                ],
            ),
        ]);
        let found = transfers(&tt, None);
        let first_runs: Vec<&str> = found.iter().map(|it| it.legs()[0].run_name.as_str()).collect();
        // Plain: slow (07:00) -> R 07:50, onward 08:10 -> Z 08:20 = 80 min.
        // Reverse: rev 08:00 -> R 08:05, onward 08:10 -> 08:20 = 20 min.
        assert!(first_runs.contains(&"rev"));
        assert!(first_runs.contains(&"slow"));
        let rev = found.iter().find(|it| it.legs()[0].run_name == "rev").unwrap();
        assert!(rev.uses_reverse_track());
        assert_eq!(rev.total_minutes(), 20);
    }

    #[test]
    fn target_time_collapses_across_forward_and_reverse_boardings() {
        let tt = Timetable::new(vec![
            track(
                1,
                &[(1, "Z", 1), (2, "A", 2), (3, "R", 3)],
                vec![run("rev", &[(2, "08:05"), (3, "08:10")])],
            ),
            track(
                2,
                &[(4, "A", 1), (5, "R", 2), (6, "Z", 3)],
                vec![
                    run("fwd", &[(4, "08:00"), (5, "08:30")]),
                    run("onward", &[(5, "08:35"), (6, "08:45")]),
                ],
            ),
        ]);

        // Without a target both boardings at A reach R.
        let found = transfers(&tt, None);
        assert_eq!(found.len(), 2);

        // From 07:50 the soonest boarding is "fwd" at 08:00, even though
        // the later "rev" would arrive sooner.
        let found = transfers(&tt, ClockTime::from_hm(7, 50));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].legs()[0].run_name, "fwd");
        assert!(!found[0].uses_reverse_track());
        assert_eq!(found[0].total_minutes(), 45);

        // From 08:01 only "rev" is left.
        let found = transfers(&tt, ClockTime::from_hm(8, 1));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].legs()[0].run_name, "rev");
        assert!(found[0].uses_reverse_track());
    }

    #[test]
    fn reverse_line_combination_dropped_when_slower() {
        let tt = Timetable::new(vec![
            track(
                1,
                &[(1, "Z", 1), (2, "A", 2), (3, "R", 3)],
                vec![run("rev", &[(2, "07:00"), (3, "07:30")])],
            ),
            track(
                2,
                &[(4, "A", 1), (5, "R", 2), (6, "Z", 3)],
                vec![
                    run("quick", &[(4, "07:50"), (5, "08:00")]),
                    run("onward", &[(5, "08:10"), (6, "08:20")]),
                ],
            ),
        ]);
        let found = transfers(&tt, None);
        // Plain: quick 07:50 -> 08:00, onward -> 08:20 = 30 min.
        // Reverse: 07:00 -> 08:20 = 80 min, not strictly faster.
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].legs()[0].run_name, "quick");
        assert!(!found[0].uses_reverse_track());
    }

    #[test]
    fn same_run_without_wait_is_not_a_transfer() {
        // Run "s" is listed on both lines and continues through M.
        let tt = Timetable::new(vec![
            track(1, &[(1, "A", 1), (2, "M", 2)], vec![run("s", &[(1, "08:00"), (2, "08:10")])]),
            track(2, &[(3, "M", 1), (4, "Z", 2)], vec![run("s", &[(3, "08:10"), (4, "08:20")])]),
        ]);
        assert!(transfers(&tt, None).is_empty());
    }

    #[test]
    fn transfer_stations_are_reachable() {
        let tt = two_lines();
        let reachable = reachable_stations(&tt, "A", "Z");
        for it in transfers(&tt, None) {
            for station in it.transfer_stations() {
                assert!(reachable.contains(&station));
            }
        }
    }
}
