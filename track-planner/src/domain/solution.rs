//! Itineraries returned by the planner.
//!
//! These are the serialized result types: they mirror the JSON the cache
//! stores and the web layer returns, so field names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClockTime, TrackId};

/// A single-leg itinerary: one run from origin to destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectSolution {
    #[serde(rename = "cityTrackId")]
    pub track_id: TrackId,
    pub train_name: String,
    pub start_station: String,
    pub end_station: String,
    pub depart_time: ClockTime,
    pub arrive_time: ClockTime,
    pub duration_minutes: u32,
}

/// One leg of a transfer itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferLeg {
    #[serde(rename = "cityTrackId")]
    pub track_id: TrackId,
    pub train_name: String,
    pub from_station: String,
    pub to_station: String,
    pub depart_time: ClockTime,
    pub arrive_time: ClockTime,
    pub duration_minutes: u32,
}

/// A two- or three-leg itinerary.
///
/// # Invariants
///
/// - `legs.len() == transfer_stations.len() + 1`
/// - `wait_minutes.len() == transfer_stations.len()`
/// - `total_minutes` is the sum of all leg durations and waits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSolution {
    pub transfer_stations: Vec<String>,
    pub legs: Vec<TransferLeg>,
    pub wait_minutes: Vec<u32>,
    pub total_minutes: u32,
}

impl TransferSolution {
    /// Number of changes between runs.
    pub fn change_count(&self) -> usize {
        self.transfer_stations.len()
    }

    /// Departure time of the first leg.
    pub fn depart_time(&self) -> Option<ClockTime> {
        self.legs.first().map(|l| l.depart_time)
    }

    /// Arrival time of the last leg.
    pub fn arrive_time(&self) -> Option<ClockTime> {
        self.legs.last().map(|l| l.arrive_time)
    }

    /// Total time spent waiting at transfer stations.
    pub fn summed_wait(&self) -> u32 {
        self.wait_minutes.iter().sum()
    }
}

/// Planner output for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depart_time: Option<ClockTime>,
    pub direct: Vec<DirectSolution>,
    pub transfers: Vec<TransferSolution>,
    pub generated_at: DateTime<Utc>,
}

impl QueryResult {
    /// Shortest direct duration, if any direct service exists.
    pub fn fastest_direct_minutes(&self) -> Option<u32> {
        self.direct.iter().map(|d| d.duration_minutes).min()
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.transfers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn leg(name: &str, from: &str, to: &str, dep: &str, arr: &str, dur: u32) -> TransferLeg {
        TransferLeg {
            track_id: TrackId(1),
            train_name: name.to_string(),
            from_station: from.to_string(),
            to_station: to.to_string(),
            depart_time: t(dep),
            arrive_time: t(arr),
            duration_minutes: dur,
        }
    }

    #[test]
    fn transfer_accessors() {
        let solution = TransferSolution {
            transfer_stations: vec!["B".into()],
            legs: vec![
                leg("X1", "A", "B", "08:00", "08:20", 20),
                leg("Y1", "B", "C", "08:25", "08:50", 25),
            ],
            wait_minutes: vec![5],
            total_minutes: 50,
        };

        assert_eq!(solution.change_count(), 1);
        assert_eq!(solution.depart_time(), Some(t("08:00")));
        assert_eq!(solution.arrive_time(), Some(t("08:50")));
        assert_eq!(solution.summed_wait(), 5);
    }

    #[test]
    fn direct_solution_json_shape() {
        let d = DirectSolution {
            track_id: TrackId(240),
            train_name: "S4731".into(),
            start_station: "竹料".into(),
            end_station: "科韵路".into(),
            depart_time: t("07:29"),
            arrive_time: t("08:02"),
            duration_minutes: 33,
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["cityTrackId"], 240);
        assert_eq!(json["trainName"], "S4731");
        assert_eq!(json["departTime"], "07:29");
        assert_eq!(json["durationMinutes"], 33);
    }

    #[test]
    fn query_result_roundtrips_through_json() {
        let result = QueryResult {
            start: "A".into(),
            end: "B".into(),
            depart_time: None,
            direct: vec![],
            transfers: vec![],
            generated_at: DateTime::parse_from_rfc3339("2024-03-15T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("departTime"));
        let back: QueryResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert!(back.is_empty());
        assert_eq!(back.fastest_direct_minutes(), None);
    }
}
