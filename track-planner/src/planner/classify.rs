//! How each line relates to a query's origin and destination.
//!
//! Which stations may end a first leg or start a second leg depends on
//! whether a line carries the origin, the destination, or both, and in
//! which order. All of that is decided by [`TrackRole`].

use std::collections::BTreeSet;

use crate::domain::{Direction, Track, TrackId};

/// Role of one line for one origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackRole {
    /// Carries both, origin first.
    Direct { origin: i32, destination: i32 },
    /// Carries both, destination first.
    Reverse { origin: i32, destination: i32 },
    /// Carries the origin only.
    OriginOnly { origin: i32 },
    /// Carries the destination only.
    DestinationOnly { destination: i32 },
}

impl TrackRole {
    /// Classify `track`, or `None` if it carries neither station.
    pub fn of(track: &Track, origin: &str, destination: &str) -> Option<Self> {
        match (track.position_of(origin), track.position_of(destination)) {
            (Some(o), Some(d)) if o < d => Some(TrackRole::Direct {
                origin: o,
                destination: d,
            }),
            (Some(o), Some(d)) if o > d => Some(TrackRole::Reverse {
                origin: o,
                destination: d,
            }),
            // Same position for both names: no usable order on this line.
            (Some(o), Some(_)) => Some(TrackRole::OriginOnly { origin: o }),
            (Some(o), None) => Some(TrackRole::OriginOnly { origin: o }),
            (None, Some(d)) => Some(TrackRole::DestinationOnly { destination: d }),
            (None, None) => None,
        }
    }

    /// Position of the origin on this line, if it has one.
    pub fn origin(self) -> Option<i32> {
        match self {
            TrackRole::Direct { origin, .. }
            | TrackRole::Reverse { origin, .. }
            | TrackRole::OriginOnly { origin } => Some(origin),
            TrackRole::DestinationOnly { .. } => None,
        }
    }

    /// Position of the destination on this line, if it has one.
    pub fn destination(self) -> Option<i32> {
        match self {
            TrackRole::Direct { destination, .. }
            | TrackRole::Reverse { destination, .. }
            | TrackRole::DestinationOnly { destination } => Some(destination),
            TrackRole::OriginOnly { .. } => None,
        }
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, TrackRole::Reverse { .. })
    }

    /// Whether a first leg from the origin may end at `candidate`.
    pub fn admits_first_leg(self, candidate: i32) -> bool {
        match self {
            TrackRole::Direct {
                origin,
                destination,
            } => Direction::Forward.strictly_between(origin, candidate, destination),
            // Ride away from the destination, then come back on another line.
            TrackRole::Reverse { origin, .. } => Direction::Forward.advances(origin, candidate),
            TrackRole::OriginOnly { origin } => candidate != origin,
            TrackRole::DestinationOnly { .. } => false,
        }
    }

    /// Whether a second leg to the destination may start at `candidate`.
    pub fn admits_second_leg(self, candidate: i32) -> bool {
        match self {
            TrackRole::Direct {
                origin,
                destination,
            } => Direction::Forward.strictly_between(origin, candidate, destination),
            TrackRole::Reverse { .. } | TrackRole::OriginOnly { .. } => false,
            TrackRole::DestinationOnly { destination } => {
                Direction::Forward.advances(candidate, destination)
            }
        }
    }
}

/// Lines that carry both origin and destination, split by order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TrackClassification {
    pub direct: BTreeSet<TrackId>,
    pub reverse: BTreeSet<TrackId>,
}

impl TrackClassification {
    pub fn classify<'a>(
        tracks: impl IntoIterator<Item = &'a Track>,
        origin: &str,
        destination: &str,
    ) -> Self {
        let mut classification = Self::default();
        for track in tracks {
            match TrackRole::of(track, origin, destination) {
                Some(TrackRole::Direct { .. }) => {
                    classification.direct.insert(track.id());
                }
                Some(TrackRole::Reverse { .. }) => {
                    classification.reverse.insert(track.id());
                }
                _ => {}
            }
        }
        classification
    }

    /// No single line serves the pair in either order.
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.reverse.is_empty()
    }
}
