use serde::{Deserialize, Serialize};

use crate::utils::prelude::*;
use super::coords::Offset;

/// Identifies a board; at most one board of each type is registered at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardType {
    Battle,
    Bench,
    Inventory,
    Shop,
    Overflow,
}

impl BoardType {
    pub const ALL: [BoardType; 5] = [
        BoardType::Battle,
        BoardType::Bench,
        BoardType::Inventory,
        BoardType::Shop,
        BoardType::Overflow,
    ];

    /// Notates the board type.
    pub fn notate(&self) -> &'static str {
        match self {
            BoardType::Battle    => "battle",
            BoardType::Bench     => "bench",
            BoardType::Inventory => "inventory",
            BoardType::Shop      => "shop",
            BoardType::Overflow  => "overflow",
        }
    }
}

impl std::str::FromStr for BoardType {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BoardType::ALL
            .into_iter()
            .find(|kind| kind.notate().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("unrecognized board type {s}"))
    }
}

impl std::fmt::Display for BoardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notate())
    }
}

/// The eight directions a neighbour can be found in. Rows grow upwards, columns grow rightwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
    pub const DIAGONAL: [Direction; 4] = [Direction::UpLeft, Direction::UpRight, Direction::DownLeft, Direction::DownRight];
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Whether this direction points at a corner rather than an edge.
    pub fn is_diagonal(&self) -> bool {
        Direction::DIAGONAL.contains(self)
    }

    /// The unit step in this direction.
    pub fn offset(&self) -> Offset {
        match self {
            Direction::Up        => Offset::new(0, 1),
            Direction::Down      => Offset::new(0, -1),
            Direction::Left      => Offset::new(-1, 0),
            Direction::Right     => Offset::new(1, 0),
            Direction::UpLeft    => Offset::new(-1, 1),
            Direction::UpRight   => Offset::new(1, 1),
            Direction::DownLeft  => Offset::new(-1, -1),
            Direction::DownRight => Offset::new(1, -1),
        }
    }

    /// The direction pointing back.
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up        => Direction::Down,
            Direction::Down      => Direction::Up,
            Direction::Left      => Direction::Right,
            Direction::Right     => Direction::Left,
            Direction::UpLeft    => Direction::DownRight,
            Direction::UpRight   => Direction::DownLeft,
            Direction::DownLeft  => Direction::UpRight,
            Direction::DownRight => Direction::UpLeft,
        }
    }

    /// Notates the direction.
    pub fn notate(&self) -> &'static str {
        match self {
            Direction::Up        => "up",
            Direction::Down      => "down",
            Direction::Left      => "left",
            Direction::Right     => "right",
            Direction::UpLeft    => "upleft",
            Direction::UpRight   => "upright",
            Direction::DownLeft  => "downleft",
            Direction::DownRight => "downright",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.replace(['-', '_'], "");
        Direction::ALL
            .into_iter()
            .find(|d| d.notate().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| anyhow!("unrecognized direction {s}"))
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_board_types() {
        assert_eq!("Shop".parse::<BoardType>().unwrap(), BoardType::Shop);
        assert_eq!("overflow".parse::<BoardType>().unwrap(), BoardType::Overflow);
        assert!("graveyard".parse::<BoardType>().is_err());
    }

    #[test]
    fn parse_directions() {
        assert_eq!("up-left".parse::<Direction>().unwrap(), Direction::UpLeft);
        assert_eq!("DOWN_RIGHT".parse::<Direction>().unwrap(), Direction::DownRight);
        assert_eq!("left".parse::<Direction>().unwrap(), Direction::Left);
    }

    #[test]
    fn opposites_cancel() {
        for d in Direction::ALL {
            let [a, b] = [d.offset(), d.opposite().offset()];
            assert_eq!((a.cols + b.cols, a.rows + b.rows), (0, 0));
            assert_eq!(d.is_diagonal(), d.opposite().is_diagonal());
        }
    }
}
