//! File-backed route generator.

use chrono::Utc;

use crate::position::Position;

use super::PositionSource;

/// A generator over an eagerly loaded, ordered route.
///
/// Owns its position list exclusively. Loaders store a placeholder
/// timestamp; the generator stamps `time` with the current UTC moment on
/// every pull, since the source formats carry no usable timestamps.
#[derive(Debug)]
pub struct RouteGenerator {
    positions: Vec<Position>,
    cursor: usize,
}

impl RouteGenerator {
    pub(crate) fn new(positions: Vec<Position>) -> Self {
        Self {
            positions,
            cursor: 0,
        }
    }

    /// Total number of points in the route.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the route holds no points at all.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl PositionSource for RouteGenerator {
    fn next_position(&mut self) -> Option<Position> {
        let position = self.positions.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(Position {
            time: Utc::now(),
            ..position
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn route(count: u32) -> RouteGenerator {
        let positions = (1..=count)
            .map(|i| Position::new(i, i as f64, i as f64, 0.0, 0.0, DateTime::UNIX_EPOCH))
            .collect();
        RouteGenerator::new(positions)
    }

    #[test]
    fn test_yields_points_in_order() {
        let mut generator = route(3);
        for expected in 1..=3 {
            let position = generator.next_position().unwrap();
            assert_eq!(position.index, expected);
        }
    }

    #[test]
    fn test_exhaustion_is_idempotent() {
        let mut generator = route(2);
        assert!(generator.next_position().is_some());
        assert!(generator.next_position().is_some());

        // Pulling past the end keeps signalling exhaustion, never re-wraps
        assert!(generator.next_position().is_none());
        assert!(generator.next_position().is_none());
    }

    #[test]
    fn test_stamps_emission_time() {
        let mut generator = route(1);
        let before = Utc::now();
        let position = generator.next_position().unwrap();
        let after = Utc::now();

        assert!(position.time >= before && position.time <= after);
        assert_ne!(position.time, DateTime::UNIX_EPOCH);
    }
}
