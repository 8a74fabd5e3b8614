use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Sub};

/// Grid coordinate as (row, column). Rows grow downwards, columns to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: i16,
    pub col: i16,
}

impl Position {
    pub fn new(row: i16, col: i16) -> Self {
        Position { row, col }
    }

    /// Manhattan distance.
    pub fn dist(self, other: Position) -> i32 {
        (i32::from(self.row) - i32::from(other.row)).abs()
            + (i32::from(self.col) - i32::from(other.col)).abs()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// The four cardinal directions used by every action variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    fn delta(self) -> (i16, i16) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Direction::North => write!(f, "N"),
            Direction::South => write!(f, "S"),
            Direction::East => write!(f, "E"),
            Direction::West => write!(f, "W"),
        }
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, dir: Direction) -> Position {
        let (dr, dc) = dir.delta();
        Position::new(self.row + dr, self.col + dc)
    }
}

impl Sub<Direction> for Position {
    type Output = Position;

    fn sub(self, dir: Direction) -> Position {
        let (dr, dc) = dir.delta();
        Position::new(self.row - dr, self.col - dc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let pos = Position::new(3, 4);
        assert_eq!(pos + Direction::North, Position::new(2, 4));
        assert_eq!(pos + Direction::South, Position::new(4, 4));
        assert_eq!(pos + Direction::East, Position::new(3, 5));
        assert_eq!(pos + Direction::West, Position::new(3, 3));
        assert_eq!(pos - Direction::North, pos + Direction::South);
        assert_eq!(pos - Direction::East, pos + Direction::West);
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Position::new(0, 0).dist(Position::new(2, 3)), 5);
        assert_eq!(Position::new(2, 3).dist(Position::new(0, 0)), 5);
        assert_eq!(Position::new(1, 1).dist(Position::new(1, 1)), 0);
    }

    #[test]
    fn formatting_directions() {
        let formatted: String = Direction::ALL.iter().map(|d| d.to_string()).collect();
        assert_eq!(formatted, "NSEW");
    }
}
