//! Result ranking for direct and transfer solutions.
//!
//! Ranks candidates to present the earliest arrivals first, then removes
//! duplicates and applies the result caps.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::ClockTime;

use super::itinerary::{Itinerary, TimedLeg};

/// Rank direct legs.
///
/// Legs are ranked by:
/// 1. Arrival (earlier is better)
/// 2. Duration (shorter is better)
/// 3. Departure (earlier is better)
///
/// The first leg for each run (see [`TimedLeg::key`]) is kept and at most
/// `cap` legs are returned.
pub(crate) fn rank_directs(mut legs: Vec<TimedLeg>, cap: usize) -> Vec<TimedLeg> {
    legs.sort_by(compare_directs);

    let mut seen = HashSet::new();
    legs.into_iter()
        .filter(|leg| seen.insert(leg.key()))
        .take(cap)
        .collect()
}

fn compare_directs(a: &TimedLeg, b: &TimedLeg) -> Ordering {
    a.arrive
        .cmp(&b.arrive)
        .then_with(|| a.duration().cmp(&b.duration()))
        .then_with(|| a.depart.cmp(&b.depart))
        .then_with(|| a.track.cmp(&b.track))
        .then_with(|| a.run_name.cmp(&b.run_name))
}

/// Itinerary tagged with its discovery order, for stable tie-breaking.
#[derive(Debug, Clone)]
pub(crate) struct Ranked {
    pub seq: u64,
    pub itinerary: Itinerary,
}

/// Ordering used when the working set is pruned: fastest first.
pub(crate) fn compare_for_pruning(a: &Ranked, b: &Ranked) -> Ordering {
    a.itinerary
        .total_minutes()
        .cmp(&b.itinerary.total_minutes())
        .then_with(|| a.itinerary.summed_wait().cmp(&b.itinerary.summed_wait()))
        .then_with(|| a.itinerary.arrival().cmp(&b.itinerary.arrival()))
        .then_with(|| a.seq.cmp(&b.seq))
}

/// Ordering of the final transfer list: earliest arrival first.
pub(crate) fn compare_for_output(a: &Ranked, b: &Ranked) -> Ordering {
    a.itinerary
        .arrival()
        .cmp(&b.itinerary.arrival())
        .then_with(|| a.itinerary.total_minutes().cmp(&b.itinerary.total_minutes()))
        .then_with(|| a.itinerary.summed_wait().cmp(&b.itinerary.summed_wait()))
        .then_with(|| a.seq.cmp(&b.seq))
}

/// Sort itineraries for output, drop duplicates (same transfer stations
/// and same first run) and cap.
pub(crate) fn rank_itineraries(mut entries: Vec<Ranked>, cap: usize) -> Vec<Itinerary> {
    entries.sort_by(compare_for_output);

    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.itinerary.dedup_key()))
        .take(cap)
        .map(|e| e.itinerary)
        .collect()
}

/// The leg that departs soonest at or after `target`.
///
/// Ties go to the earlier arrival, then line id and run name. Returns
/// `None` if every leg departs before `target`.
pub(crate) fn nearest_departure<'a>(
    legs: impl IntoIterator<Item = &'a TimedLeg>,
    target: ClockTime,
) -> Option<&'a TimedLeg> {
    legs.into_iter()
        .filter(|leg| leg.depart_clock() >= target)
        .min_by(|a, b| {
            a.depart_clock()
                .cmp(&b.depart_clock())
                .then_with(|| a.arrive.cmp(&b.arrive))
                .then_with(|| a.track.cmp(&b.track))
                .then_with(|| a.run_name.cmp(&b.run_name))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrackId;

    fn leg(name: &str, track: u32, depart: u32, arrive: u32) -> TimedLeg {
        TimedLeg {
            track: TrackId(track),
            run_name: name.to_string(),
            from: "A".to_string(),
            to: "B".to_string(),
            depart,
            arrive,
        }
    }

    fn transfer(station: &str, first: &str, d1: u32, a1: u32, d2: u32, a2: u32) -> Itinerary {
        let l1 = TimedLeg {
            to: station.to_string(),
            ..leg(first, 1, d1, a1)
        };
        let l2 = TimedLeg {
            from: station.to_string(),
            to: "Z".to_string(),
            ..leg("second", 2, d2, a2)
        };
        Itinerary::join(&l1, &l2, 180, false).unwrap()
    }

    #[test]
    fn directs_sorted_by_arrival_then_duration() {
        let ranked = rank_directs(
            vec![
                leg("late", 1, 600, 640),
                leg("slow", 1, 480, 560),
                leg("fast", 1, 520, 560),
            ],
            10,
        );
        let names: Vec<&str> = ranked.iter().map(|l| l.run_name.as_str()).collect();
        assert_eq!(names, vec!["fast", "slow", "late"]);
    }

    #[test]
    fn directs_dedup_by_run_name_keeps_best() {
        let ranked = rank_directs(vec![leg("S1", 1, 600, 640), leg("S1", 2, 480, 500)], 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].track, TrackId(2));
    }

    #[test]
    fn unnamed_directs_dedup_by_track_and_times() {
        let ranked = rank_directs(
            vec![
                leg("", 1, 480, 500),
                leg("", 1, 480, 500),
                leg("", 2, 480, 500),
                leg("", 1, 490, 510),
            ],
            10,
        );
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn directs_capped() {
        let legs = (0..20).map(|i| leg(&format!("R{i}"), 1, i, i + 10)).collect();
        assert_eq!(rank_directs(legs, 5).len(), 5);
    }

    #[test]
    fn itineraries_sorted_and_deduped() {
        let entries = vec![
            Ranked {
                seq: 0,
                itinerary: transfer("M", "X", 480, 500, 510, 560),
            },
            // Same station and first run, worse arrival: dropped.
            Ranked {
                seq: 1,
                itinerary: transfer("M", "X", 480, 500, 530, 580),
            },
            Ranked {
                seq: 2,
                itinerary: transfer("N", "X", 480, 500, 505, 540),
            },
        ];
        let ranked = rank_itineraries(entries, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].transfer_stations(), vec!["N".to_string()]);
        assert_eq!(ranked[1].arrival(), 560);
    }

    #[test]
    fn nearest_departure_picks_smallest_non_negative_gap() {
        let legs = vec![
            leg("early", 1, 420, 450),
            leg("next", 1, 449, 482),
            leg("later", 1, 470, 490),
        ];
        let target = ClockTime::from_hm(7, 20).unwrap();
        assert_eq!(nearest_departure(&legs, target).unwrap().run_name, "next");

        let target = ClockTime::from_hm(8, 0).unwrap();
        assert!(nearest_departure(&legs, target).is_none());
    }

    #[test]
    fn nearest_departure_includes_exact_match() {
        let legs = vec![leg("exact", 1, 440, 470)];
        let target = ClockTime::from_hm(7, 20).unwrap();
        assert_eq!(nearest_departure(&legs, target).unwrap().run_name, "exact");
    }
}
