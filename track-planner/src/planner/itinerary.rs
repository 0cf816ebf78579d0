//! Working representation of legs and multi-leg itineraries.
//!
//! Builders work in absolute minutes so that day rollover propagates
//! through chained legs; clock times are only derived when a result is
//! turned into a [`DirectSolution`] or [`TransferSolution`].

use crate::domain::{
    ClockTime, DirectSolution, MINUTES_PER_DAY, TrackId, TransferLeg, TransferSolution,
};

use super::leg_timing::LegTiming;

/// One ride on one run.
///
/// # Invariants
///
/// - `arrive > depart`
/// - `depart` and `arrive` are minutes since the query day's midnight and
///   may exceed one day after chaining
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TimedLeg {
    pub track: TrackId,
    pub run_name: String,
    pub from: String,
    pub to: String,
    pub depart: u32,
    pub arrive: u32,
}

/// Identity of a leg for deduplication.
///
/// Named runs are identified by name alone; unnamed runs by line and times.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum LegKey {
    Run(String),
    Unnamed {
        track: TrackId,
        depart: ClockTime,
        arrive: ClockTime,
    },
}

impl TimedLeg {
    /// Build a leg from a resolved timing. Returns `None` for legs that do
    /// not take any time.
    pub fn from_timing(
        track: TrackId,
        run_name: &str,
        from: &str,
        to: &str,
        timing: LegTiming,
    ) -> Option<Self> {
        if timing.arrive_min <= timing.depart_min {
            return None;
        }
        Some(Self {
            track,
            run_name: run_name.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            depart: timing.depart_min,
            arrive: timing.arrive_min,
        })
    }

    pub fn duration(&self) -> u32 {
        self.arrive - self.depart
    }

    pub fn depart_clock(&self) -> ClockTime {
        ClockTime::from_minutes_wrapping(self.depart)
    }

    pub fn arrive_clock(&self) -> ClockTime {
        ClockTime::from_minutes_wrapping(self.arrive)
    }

    pub fn key(&self) -> LegKey {
        if self.run_name.is_empty() {
            LegKey::Unnamed {
                track: self.track,
                depart: self.depart_clock(),
                arrive: self.arrive_clock(),
            }
        } else {
            LegKey::Run(self.run_name.clone())
        }
    }

    /// The same leg `days` days later.
    fn shifted(&self, days: u32) -> Self {
        let offset = days * MINUTES_PER_DAY;
        Self {
            depart: self.depart + offset,
            arrive: self.arrive + offset,
            ..self.clone()
        }
    }

    pub fn to_direct(&self) -> DirectSolution {
        DirectSolution {
            track_id: self.track,
            train_name: self.run_name.clone(),
            start_station: self.from.clone(),
            end_station: self.to.clone(),
            depart_time: self.depart_clock(),
            arrive_time: self.arrive_clock(),
            duration_minutes: self.duration(),
        }
    }

    pub fn to_transfer_leg(&self) -> TransferLeg {
        TransferLeg {
            track_id: self.track,
            train_name: self.run_name.clone(),
            from_station: self.from.clone(),
            to_station: self.to.clone(),
            depart_time: self.depart_clock(),
            arrive_time: self.arrive_clock(),
            duration_minutes: self.duration(),
        }
    }
}

/// Join `next` onto `prev` at a transfer station.
///
/// `next` is moved forward by whole days until it departs no earlier than
/// `prev` arrives. Returns the shifted leg and the wait, or `None` when:
/// - either leg takes no time;
/// - the wait exceeds `max_wait`;
/// - both legs are the same named run with no wait (that is a through
///   service, not a change).
pub(crate) fn connect(prev: &TimedLeg, next: &TimedLeg, max_wait: u32) -> Option<(TimedLeg, u32)> {
    if prev.duration() == 0 || next.duration() == 0 {
        return None;
    }

    let next = if next.depart < prev.arrive {
        next.shifted((prev.arrive - next.depart).div_ceil(MINUTES_PER_DAY))
    } else {
        next.clone()
    };

    let wait = next.depart - prev.arrive;
    if wait > max_wait {
        return None;
    }
    if wait == 0 && !prev.run_name.is_empty() && prev.run_name == next.run_name {
        return None;
    }

    Some((next, wait))
}

/// Legs ordered by clock departure, for finding onward connections within
/// a wait window.
#[derive(Debug, Clone, Default)]
pub(crate) struct DepartureBoard {
    legs: Vec<TimedLeg>,
}

impl DepartureBoard {
    pub fn new(mut legs: Vec<TimedLeg>) -> Self {
        legs.sort_by(|a, b| {
            clock_minutes(a)
                .cmp(&clock_minutes(b))
                .then_with(|| a.arrive.cmp(&b.arrive))
                .then_with(|| a.track.cmp(&b.track))
                .then_with(|| a.run_name.cmp(&b.run_name))
        });
        Self { legs }
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Legs whose clock departure is at most `max_wait` minutes after
    /// `prev` arrives, wrapping past midnight.
    ///
    /// Candidates only; [`connect`] still decides whether each one joins.
    pub fn connections(&self, prev: &TimedLeg, max_wait: u32) -> impl Iterator<Item = &TimedLeg> {
        let start = prev.arrive % MINUTES_PER_DAY;
        let end = start + max_wait;
        let (head, tail) = if max_wait >= MINUTES_PER_DAY - 1 {
            (&self.legs[..], &self.legs[..0])
        } else if end < MINUTES_PER_DAY {
            (self.departing_between(start, end), &self.legs[..0])
        } else {
            (
                self.departing_between(start, MINUTES_PER_DAY - 1),
                self.departing_between(0, end - MINUTES_PER_DAY),
            )
        };
        head.iter().chain(tail.iter())
    }

    fn departing_between(&self, lo: u32, hi: u32) -> &[TimedLeg] {
        let from = self.legs.partition_point(|l| clock_minutes(l) < lo);
        let to = self.legs.partition_point(|l| clock_minutes(l) <= hi);
        &self.legs[from..to.max(from)]
    }
}

fn clock_minutes(leg: &TimedLeg) -> u32 {
    leg.depart % MINUTES_PER_DAY
}

/// A chain of two or more legs joined at transfer stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Itinerary {
    legs: Vec<TimedLeg>,
    waits: Vec<u32>,
    /// Whether any leg was boarded on a line that runs away from the
    /// destination.
    uses_reverse_track: bool,
}

impl Itinerary {
    /// Start a chain from a first leg and extend it with `next`.
    pub fn join(
        first: &TimedLeg,
        next: &TimedLeg,
        max_wait: u32,
        uses_reverse_track: bool,
    ) -> Option<Self> {
        let (next, wait) = connect(first, next, max_wait)?;
        Some(Self {
            legs: vec![first.clone(), next],
            waits: vec![wait],
            uses_reverse_track,
        })
    }

    /// Append another leg to the chain.
    pub fn then(&self, next: &TimedLeg, max_wait: u32) -> Option<Self> {
        let last = self.legs.last()?;
        let (next, wait) = connect(last, next, max_wait)?;
        let mut extended = self.clone();
        extended.legs.push(next);
        extended.waits.push(wait);
        Some(extended)
    }

    pub fn legs(&self) -> &[TimedLeg] {
        &self.legs
    }

    pub fn waits(&self) -> &[u32] {
        &self.waits
    }

    pub fn uses_reverse_track(&self) -> bool {
        self.uses_reverse_track
    }

    /// Absolute departure of the first leg.
    pub fn departure(&self) -> u32 {
        self.legs.first().map_or(0, |l| l.depart)
    }

    /// Absolute arrival of the last leg.
    pub fn arrival(&self) -> u32 {
        self.legs.last().map_or(0, |l| l.arrive)
    }

    /// Leg durations plus waits.
    pub fn total_minutes(&self) -> u32 {
        self.arrival() - self.departure()
    }

    pub fn summed_wait(&self) -> u32 {
        self.waits.iter().sum()
    }

    pub fn transfer_stations(&self) -> Vec<String> {
        self.legs.iter().skip(1).map(|l| l.from.clone()).collect()
    }

    /// Deduplication key: where the changes happen and which first run is
    /// taken.
    pub fn dedup_key(&self) -> (Vec<String>, Option<LegKey>) {
        (
            self.transfer_stations(),
            self.legs.first().map(TimedLeg::key),
        )
    }

    pub fn to_solution(&self) -> TransferSolution {
        TransferSolution {
            transfer_stations: self.transfer_stations(),
            legs: self.legs.iter().map(TimedLeg::to_transfer_leg).collect(),
            wait_minutes: self.waits.clone(),
            total_minutes: self.total_minutes(),
        }
    }
}
