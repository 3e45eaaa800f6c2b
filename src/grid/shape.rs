use serde::{Deserialize, Serialize};

use crate::grid::prelude::*;

/// A declarative description of which cells of a board are usable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardShape {
    #[default]
    Rectangle,
    Square,
    /// Row `r` spans columns `0..=r`, so each row is one column wider than the one below it.
    RightTriangle,
    /// Each row is a centred span that widens towards the top row.
    IsoscelesTriangle,
    /// An explicit list of usable cells; duplicates collapse.
    Custom { cells: Vec<Coord> },
}

impl BoardShape {
    /// Computes the set of usable coordinates for a board of the given size.
    ///
    /// Degenerate sizes produce an empty mask, as do custom lists that fall entirely off the board.
    pub fn allowed_mask(&self, columns: i32, rows: i32) -> BTreeSet<Coord> {
        if columns <= 0 || rows <= 0 {
            return BTreeSet::new();
        }

        let spans = |row: i32| -> std::ops::Range<i32> {
            match self {
                BoardShape::Rectangle | BoardShape::Square => 0..columns,
                BoardShape::RightTriangle => 0..(row.min(columns - 1) + 1),
                BoardShape::IsoscelesTriangle => {
                    let width = isosceles_width(columns, rows, row);
                    let start = (columns - width) / 2;
                    start..(start + width)
                }
                BoardShape::Custom { .. } => 0..0,
            }
        };

        match self {
            BoardShape::Custom { cells } => cells
                .iter()
                .filter(|c| (0..columns).contains(&c.col) && (0..rows).contains(&c.row))
                .copied()
                .collect(),
            _ => (0..rows)
                .flat_map(|row| spans(row).map(move |col| Coord::new(col, row)))
                .collect(),
        }
    }

    /// Notates the shape kind.
    pub fn notate(&self) -> &'static str {
        match self {
            BoardShape::Rectangle         => "rectangle",
            BoardShape::Square            => "square",
            BoardShape::RightTriangle     => "right_triangle",
            BoardShape::IsoscelesTriangle => "isosceles_triangle",
            BoardShape::Custom { .. }     => "custom",
        }
    }
}

/// `round(columns * (row + 1) / rows)` with halves rounded up, in integers so the result never depends on float error.
fn isosceles_width(columns: i32, rows: i32, row: i32) -> i32 {
    let numerator = columns as i64 * (row as i64 + 1);
    let denominator = rows as i64;
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    (rounded as i32).clamp(0, columns)
}

impl std::str::FromStr for BoardShape {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "rectangle" | "rect"                 => Ok(BoardShape::Rectangle),
            "square"                             => Ok(BoardShape::Square),
            "right_triangle" | "right"           => Ok(BoardShape::RightTriangle),
            "isosceles_triangle" | "isosceles"   => Ok(BoardShape::IsoscelesTriangle),
            _ => Err(anyhow!("unrecognized board shape {s}; custom shapes must be declared in a session file")),
        }
    }
}
