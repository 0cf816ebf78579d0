//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::ClockTime;
use crate::planner::Query as TripQuery;
use crate::timetable::Timetable;

use super::routes::AppError;

/// Query string of `/train-schedule`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleParams {
    /// Origin station name
    pub start: Option<String>,

    /// Destination station name
    pub end: Option<String>,

    /// Earliest departure, "HH:MM"; empty means any time
    pub depart_time: Option<String>,
}

impl ScheduleParams {
    /// Check the parameters against the timetable and build a planner query.
    pub fn to_query(&self, timetable: &Timetable) -> Result<TripQuery, AppError> {
        let start = self.start.as_deref().map(str::trim).unwrap_or_default();
        let end = self.end.as_deref().map(str::trim).unwrap_or_default();

        if start.is_empty() || end.is_empty() {
            return Err(AppError::BadRequest {
                message: "Missing query parameters: start and end".to_string(),
            });
        }
        if start == end {
            return Err(AppError::BadRequest {
                message: "Start and end stations cannot be the same.".to_string(),
            });
        }
        if !timetable.contains_station(start) || !timetable.contains_station(end) {
            return Err(AppError::BadRequest {
                message: "One or both stations not found in the system.".to_string(),
            });
        }

        let query = TripQuery::new(start, end);
        match self.depart_time.as_deref().map(str::trim) {
            None | Some("") => Ok(query),
            Some(raw) => ClockTime::parse_hhmm(raw)
                .map(|t| query.with_depart_after(t))
                .map_err(|e| AppError::BadRequest {
                    message: format!("Invalid departTime: {e}"),
                }),
        }
    }
}

/// Response of `/api/stations`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StationsResponse {
    pub stations: Vec<String>,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Station, StationId, Track, TrackId};

    fn timetable() -> Timetable {
        Timetable::new(vec![Track::new(
            TrackId(1),
            "L1",
            vec![
                Station::new(StationId(1), "竹料", 1),
                Station::new(StationId(2), "科韵路", 2),
            ],
            vec![],
        )])
    }

    fn params(start: Option<&str>, end: Option<&str>, time: Option<&str>) -> ScheduleParams {
        ScheduleParams {
            start: start.map(String::from),
            end: end.map(String::from),
            depart_time: time.map(String::from),
        }
    }

    fn message(result: Result<TripQuery, AppError>) -> String {
        match result {
            Err(AppError::BadRequest { message }) => message,
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn valid_query() {
        let q = params(Some(" 竹料 "), Some("科韵路"), None)
            .to_query(&timetable())
            .unwrap();
        assert_eq!(q.origin, "竹料");
        assert_eq!(q.destination, "科韵路");
        assert_eq!(q.depart_after, None);
    }

    #[test]
    fn depart_time() {
        let q = params(Some("竹料"), Some("科韵路"), Some("07:20"))
            .to_query(&timetable())
            .unwrap();
        assert_eq!(q.depart_after, ClockTime::from_hm(7, 20));

        let q = params(Some("竹料"), Some("科韵路"), Some(""))
            .to_query(&timetable())
            .unwrap();
        assert_eq!(q.depart_after, None);

        let msg = message(params(Some("竹料"), Some("科韵路"), Some("7pm")).to_query(&timetable()));
        assert!(msg.starts_with("Invalid departTime"));
    }

    #[test]
    fn missing_stations() {
        let tt = timetable();
        assert_eq!(
            message(params(None, Some("科韵路"), None).to_query(&tt)),
            "Missing query parameters: start and end"
        );
        assert_eq!(
            message(params(Some("竹料"), Some("  "), None).to_query(&tt)),
            "Missing query parameters: start and end"
        );
    }

    #[test]
    fn same_station() {
        assert_eq!(
            message(params(Some("竹料"), Some("竹料"), None).to_query(&timetable())),
            "Start and end stations cannot be the same."
        );
    }

    #[test]
    fn unknown_station() {
        assert_eq!(
            message(params(Some("竹料"), Some("火星"), None).to_query(&timetable())),
            "One or both stations not found in the system."
        );
    }

    #[test]
    fn deserializes_camel_case() {
        let p: ScheduleParams =
            serde_json::from_str(r#"{"start":"a","end":"b","departTime":"08:00"}"#).unwrap();
        assert_eq!(p.depart_time.as_deref(), Some("08:00"));
    }
}
