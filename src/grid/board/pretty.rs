use crate::grid::prelude::*;

impl Board {
    /// Pretty-prints the board, top row first.
    ///
    /// Occupied cells show the last base-36 digit of their occupant's id; every other cell shows its state.
    pub fn pretty(&self) -> String {
        (0..self.rows)
            .rev()
            .map(|row| {
                (0..self.columns)
                    .map(|col| {
                        let coord = Coord::new(col, row);
                        match self.occupant(&coord) {
                            Some(id) => char::from_digit((id % 36) as u32, 36).unwrap_or('@').to_string(),
                            None => format!("{}", self.state(&coord)),
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::prelude::*;

    #[test]
    fn renders_shape_locks_and_occupants() {
        let mut b = Board::new(
            &BoardConfig::rectangle(BoardType::Bench, 3, 3)
                .with_shape(BoardShape::RightTriangle)
                .with_locking(0.2, false),
        );
        let mut p = Placeable::new(11, Footprint::new(2, 1));
        b.try_place(&mut p, Coord::new(0, 1)).unwrap();
        b.destroy_cell(&Coord::new(2, 2));
        assert_eq!(b.pretty(), "..!\nbb#\nx##");
    }
}
