//! Station identity and line position.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric station identifier as issued by the timetable source.
///
/// Identifiers are only meaningful within one line: the same physical
/// station may carry different ids on different lines, so cross-line
/// matching is done by name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A station on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    /// Linear order along the line. Unique per line.
    pub position: i32,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            name: name.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_id_display() {
        assert_eq!(StationId(42).to_string(), "42");
        assert_eq!(format!("{:?}", StationId(7)), "StationId(7)");
    }

    #[test]
    fn station_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&StationId(12)).unwrap(), "12");
        let id: StationId = serde_json::from_str("99").unwrap();
        assert_eq!(id, StationId(99));
    }

    #[test]
    fn new_station() {
        let s = Station::new(StationId(1), "竹料", 3);
        assert_eq!(s.name, "竹料");
        assert_eq!(s.position, 3);
    }
}
