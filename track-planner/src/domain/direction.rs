//! Travel direction along a linear track.

/// Direction of travel between two positions on one line.
///
/// `Forward` follows increasing station positions, `Reverse` decreasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Direction from `from` to `to`, or `None` if they are the same position.
    ///
    /// ```
    /// use track_planner::domain::Direction;
    ///
    /// assert_eq!(Direction::between(2, 5), Some(Direction::Forward));
    /// assert_eq!(Direction::between(5, 2), Some(Direction::Reverse));
    /// assert_eq!(Direction::between(3, 3), None);
    /// ```
    pub fn between(from: i32, to: i32) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Direction::Forward),
            std::cmp::Ordering::Less => Some(Direction::Reverse),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Whether moving from `from` to `to` is a strict step in this direction.
    pub fn advances(self, from: i32, to: i32) -> bool {
        Direction::between(from, to) == Some(self)
    }

    /// Whether `position` lies strictly between `from` and `to` travelling
    /// in this direction.
    pub fn strictly_between(self, from: i32, position: i32, to: i32) -> bool {
        self.advances(from, position) && self.advances(position, to)
    }
}
