//! Reachability pruning for transfer search.
//!
//! A station can only be part of a loop-free trip from origin to
//! destination if it is reachable from the origin along line order and can
//! itself reach the destination. Both sets come from a breadth-first
//! traversal over the station graph aggregated across all lines.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::trace;

use crate::timetable::Timetable;

type Adjacency<'a> = HashMap<&'a str, BTreeSet<&'a str>>;

/// Stations that lie on some origin → destination path.
///
/// Always contains the origin and destination themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachableStations {
    stations: BTreeSet<String>,
}

impl ReachableStations {
    pub fn contains(&self, name: &str) -> bool {
        self.stations.contains(name)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Station names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.stations.iter().map(String::as_str)
    }
}

/// Compute the stations usable as transfer points between `origin` and
/// `destination`.
pub fn reachable_stations(
    timetable: &Timetable,
    origin: &str,
    destination: &str,
) -> ReachableStations {
    let mut forward: Adjacency<'_> = HashMap::new();
    let mut reverse: Adjacency<'_> = HashMap::new();

    for track in timetable.tracks() {
        for pair in track.stations().windows(2) {
            let from = pair[0].name.as_str();
            let to = pair[1].name.as_str();
            if from == to {
                continue;
            }
            forward.entry(from).or_default().insert(to);
            reverse.entry(to).or_default().insert(from);
        }
    }

    let from_origin = bfs(&forward, origin);
    let to_destination = bfs(&reverse, destination);

    let mut stations: BTreeSet<String> = from_origin
        .intersection(&to_destination)
        .map(|s| (*s).to_string())
        .collect();
    stations.insert(origin.to_string());
    stations.insert(destination.to_string());

    trace!(
        origin,
        destination,
        reachable = stations.len(),
        "computed reachable stations"
    );

    ReachableStations { stations }
}

/// Breadth-first traversal returning every node reachable from `start`,
/// including `start`.
fn bfs<'a>(adjacency: &Adjacency<'a>, start: &'a str) -> HashSet<&'a str> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        if !visited.insert(node) {
            continue;
        }
        if let Some(neighbours) = adjacency.get(node) {
            for &next in neighbours {
                if !visited.contains(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    visited
}
