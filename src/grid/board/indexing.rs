use crate::grid::prelude::*;

impl Board {
    /// Whether the coordinate lies inside the board's rectangle (regardless of shape).
    pub fn in_bounds(&self, coord: &Coord) -> bool {
        (0..self.columns).contains(&coord.col) && (0..self.rows).contains(&coord.row)
    }

    /// Whether the coordinate is usable under the board's shape.
    pub fn is_allowed(&self, coord: &Coord) -> bool {
        self.allowed.contains(coord)
    }

    /// The state of a cell; cells off the board have no flags.
    pub fn state(&self, coord: &Coord) -> CellState {
        self.index(coord).map_or(CellState::empty(), |i| self.states[i])
    }

    /// The entity covering a cell, if any.
    pub fn occupant(&self, coord: &Coord) -> Option<EntityId> {
        self.index(coord).and_then(|i| self.occupants[i])
    }

    /// The linear offset of a cell in the matrices.
    pub(super) fn index(&self, coord: &Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.row_major(self.columns) as usize)
        } else {
            None
        }
    }

    /// Sets flags on an in-bounds cell; engine use only.
    pub(super) fn insert_flags(&mut self, coord: &Coord, flags: CellState) -> () {
        if let Some(i) = self.index(coord) {
            self.states[i].insert(flags);
        }
    }

    /// Sets or clears the occupant of a cell along with its `OCCUPIED` flag; engine use only.
    pub(super) fn set_occupant(&mut self, coord: &Coord, entity: Option<EntityId>) -> () {
        if let Some(i) = self.index(coord) {
            self.occupants[i] = entity;
            self.states[i].set(CellState::OCCUPIED, entity.is_some());
        }
    }
}

impl Board {
    /// The distance between the starts of two neighbouring cells.
    fn pitch(&self) -> f32 {
        self.cell_size + self.cell_gap
    }

    /// The world position of the centre of a cell.
    pub fn coord_to_position(&self, coord: &Coord) -> Vec2 {
        let pitch = self.pitch();
        let half = self.cell_size * 0.5;
        self.origin + Vec2::new(coord.col as f32 * pitch + half, coord.row as f32 * pitch + half)
    }

    /// The cell a world position falls in. Positions inside a gap resolve to the cell before it.
    /// The result may lie outside the board.
    pub fn position_to_coord(&self, position: &Vec2) -> Coord {
        let pitch = self.pitch();
        if pitch <= 0.0 {
            return Coord::UNPLACED;
        }
        let local = *position - self.origin;
        Coord::new((local.x / pitch).floor() as i32, (local.y / pitch).floor() as i32)
    }

    /// Whether a world position lands on a usable cell of this board.
    pub fn contains_position(&self, position: &Vec2) -> bool {
        let coord = self.position_to_coord(position);
        self.in_bounds(&coord) && self.is_allowed(&coord)
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::prelude::*;

    #[test]
    fn positions_round_trip_through_cell_centres() {
        let board = Board::new(
            &BoardConfig::rectangle(BoardType::Battle, 4, 3)
                .with_spacing(2.0, 0.5)
                .with_origin(Vec2::new(10.0, -5.0)),
        );
        for coord in board.allowed().clone() {
            let centre = board.coord_to_position(&coord);
            assert_eq!(board.position_to_coord(&centre), coord);
        }
        assert_eq!(board.coord_to_position(&Coord::new(1, 2)), Vec2::new(13.5, 1.0));
    }

    #[test]
    fn containment_respects_bounds_and_mask() {
        let board = Board::new(&BoardConfig::rectangle(BoardType::Shop, 3, 3).with_shape(BoardShape::RightTriangle));
        assert!(board.contains_position(&Vec2::new(0.5, 2.5)));
        assert!(!board.contains_position(&Vec2::new(2.5, 0.5))); // outside the triangle
        assert!(!board.contains_position(&Vec2::new(-0.5, 0.5)));
        assert!(!board.contains_position(&Vec2::new(0.5, 3.5)));
    }

    #[test]
    fn off_board_cells_have_no_state() {
        let board = Board::new(&BoardConfig::rectangle(BoardType::Bench, 2, 2));
        assert_eq!(board.state(&Coord::new(0, 0)), CellState::ALLOWED);
        assert_eq!(board.state(&Coord::new(2, 0)), CellState::empty());
        assert_eq!(board.occupant(&Coord::new(-1, 0)), None);
    }
}
