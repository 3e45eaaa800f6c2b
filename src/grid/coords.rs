use serde::{Deserialize, Serialize};

use crate::utils::prelude::*;

/// A (column, row) index into a board. Columns grow to the right and rows grow upwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub col: i32,
    pub row: i32,
}

impl Coord {
    /// The origin held by entities that are not on any board.
    pub const UNPLACED: Coord = Coord { col: -1, row: -1 };

    /// Constructs a new coord.
    pub const fn new(col: i32, row: i32) -> Coord {
        Coord { col, row }
    }

    /// Whether this is the unplaced sentinel.
    pub fn is_unplaced(&self) -> bool {
        *self == Coord::UNPLACED
    }

    /// The canonical notation of the coord is `col,row`.
    pub fn notate(&self) -> String {
        format!("{},{}", self.col, self.row)
    }

    /// The linear offset of this coord on a board with the given number of columns.
    pub fn row_major(&self, columns: i32) -> i64 {
        self.row as i64 * columns as i64 + self.col as i64
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A signed step between two coords.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub cols: i32,
    pub rows: i32,
}

impl Offset {
    /// Constructs a new offset.
    pub const fn new(cols: i32, rows: i32) -> Offset {
        Offset { cols, rows }
    }
}

// C + O

impl Add<Offset> for Coord {
    type Output = Coord;
    fn add(self, rhs: Offset) -> Self::Output {
        Coord::new(self.col.saturating_add(rhs.cols), self.row.saturating_add(rhs.rows))
    }
}

impl Add<&Offset> for &Coord {
    type Output = Coord;
    fn add(self, rhs: &Offset) -> Self::Output {
        *self + *rhs
    }
}

// C - O

impl Sub<Offset> for Coord {
    type Output = Coord;
    fn sub(self, rhs: Offset) -> Self::Output {
        Coord::new(self.col.saturating_sub(rhs.cols), self.row.saturating_sub(rhs.rows))
    }
}

// C - C

impl Sub<Coord> for Coord {
    type Output = Offset;
    fn sub(self, rhs: Coord) -> Self::Output {
        Offset::new(self.col.saturating_sub(rhs.col), self.row.saturating_sub(rhs.row))
    }
}

/// A continuous position in the world (or whatever logical space the boards are laid out in).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Constructs a new position.
    pub const fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    /// The point halfway between the two positions.
    pub fn midpoint(&self, other: &Vec2) -> Vec2 {
        Vec2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl Add<Vec2> for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Self::Output {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vec2> for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// The size of an entity in cells. Both sides are at least one cell long.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FootprintRecord")]
pub struct Footprint {
    pub width: i32,
    pub height: i32,
}

/// The serialized shape of a footprint, checked before it becomes one.
#[derive(Deserialize)]
struct FootprintRecord {
    width: i32,
    height: i32,
}

impl TryFrom<FootprintRecord> for Footprint {
    type Error = String;

    fn try_from(record: FootprintRecord) -> std::result::Result<Self, Self::Error> {
        match record.width >= 1 && record.height >= 1 {
            true => Ok(Footprint { width: record.width, height: record.height }),
            _    => Err(format!("footprint {}x{} must be at least 1x1", record.width, record.height)),
        }
    }
}

impl Footprint {
    pub const UNIT: Footprint = Footprint { width: 1, height: 1 };

    /// Constructs a new footprint; sides shorter than one cell are raised to one.
    pub fn new(width: i32, height: i32) -> Footprint {
        Footprint { width: width.max(1), height: height.max(1) }
    }

    /// The footprint turned a quarter turn.
    pub fn rotated(&self) -> Footprint {
        Footprint { width: self.height, height: self.width }
    }

    /// The number of cells covered.
    pub fn area(&self) -> i32 {
        self.width.saturating_mul(self.height)
    }

    /// Whether a side is shorter than one cell, which only a hand-built literal can produce.
    pub fn is_degenerate(&self) -> bool {
        self.width < 1 || self.height < 1
    }

    /// Notates the footprint as `wxh`.
    pub fn notate(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Footprint::UNIT
    }
}

impl std::fmt::Display for Footprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notate())
    }
}

/// An inclusive rectangle of cells, i.e. a footprint anchored at its minimum corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min: Coord,
    pub max: Coord,
}

impl Rect {
    /// The rectangle covered by a footprint anchored at the given origin.
    ///
    /// The far corner saturates at the edge of the coordinate space, so a rectangle anchored near
    /// `i32::MAX` is cut short rather than wrapping around.
    pub fn at(origin: Coord, footprint: Footprint) -> Rect {
        Rect {
            min: origin,
            max: Coord::new(
                origin.col.saturating_add(footprint.width.saturating_sub(1)),
                origin.row.saturating_add(footprint.height.saturating_sub(1)),
            ),
        }
    }

    /// Whether the whole rectangle lies within `[0, columns) x [0, rows)`.
    pub fn within(&self, columns: i32, rows: i32) -> bool {
        self.min.col >= 0 && self.min.row >= 0 && self.max.col < columns && self.max.row < rows
    }

    /// The part of the rectangle within `[0, columns) x [0, rows)`, if any.
    pub fn clip(&self, columns: i32, rows: i32) -> Option<Rect> {
        let min = Coord::new(self.min.col.max(0), self.min.row.max(0));
        let max = Coord::new(self.max.col.min(columns - 1), self.max.row.min(rows - 1));
        (min.col <= max.col && min.row <= max.row).then_some(Rect { min, max })
    }

    /// Whether the rectangle covers the coord.
    pub fn contains(&self, coord: &Coord) -> bool {
        (self.min.col..=self.max.col).contains(&coord.col) && (self.min.row..=self.max.row).contains(&coord.row)
    }

    /// Every covered coord in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + use<> {
        let Rect { min, max } = *self;
        (min.row..=max.row).flat_map(move |row| (min.col..=max.col).map(move |col| Coord::new(col, row)))
    }

    /// The footprint this rectangle spans.
    pub fn footprint(&self) -> Footprint {
        Footprint::new(
            self.max.col.saturating_sub(self.min.col).saturating_add(1),
            self.max.row.saturating_sub(self.min.row).saturating_add(1),
        )
    }
}
