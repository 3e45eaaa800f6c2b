use crate::grid::prelude::*;

impl Board {
    /// The first neighbour of a hosted entity in the given direction, if any.
    pub fn neighbour(&self, id: EntityId, direction: Direction) -> Option<EntityId> {
        let mut buffer = Vec::with_capacity(1);
        self.neighbours_into(id, direction, &mut buffer);
        buffer.first().copied()
    }

    /// Every distinct neighbour of a hosted entity in the given direction.
    pub fn neighbours(&self, id: EntityId, direction: Direction) -> Vec<EntityId> {
        let mut buffer = Vec::new();
        self.neighbours_into(id, direction, &mut buffer);
        buffer
    }

    /// Fills `buffer` (after clearing it) with the distinct neighbours in the given direction.
    ///
    /// Along an edge, this is every occupant of the row or column of cells just outside that edge of
    /// the footprint. At a corner, it is the occupant of the corner cell, but only if its footprint
    /// meets this one at that corner alone; an occupant that also runs along one of the edges is an
    /// orthogonal neighbour instead.
    pub fn neighbours_into(&self, id: EntityId, direction: Direction, buffer: &mut Vec<EntityId>) -> () {
        buffer.clear();
        let Some(rect) = self.placement(id).map(|p| p.rect()) else {
            return;
        };
        let Rect { min, max } = rect;

        let scan: Vec<Coord> = match direction {
            Direction::Up    => (min.col..=max.col).map(|col| Coord::new(col, max.row + 1)).collect(),
            Direction::Down  => (min.col..=max.col).map(|col| Coord::new(col, min.row - 1)).collect(),
            Direction::Left  => (min.row..=max.row).map(|row| Coord::new(min.col - 1, row)).collect(),
            Direction::Right => (min.row..=max.row).map(|row| Coord::new(max.col + 1, row)).collect(),
            _ => {
                if let Some(other) = self.corner_neighbour(id, &rect, direction) {
                    buffer.push(other);
                }
                return;
            }
        };

        for cell in scan {
            if !self.in_bounds(&cell) {
                continue;
            }
            match self.occupant(&cell) {
                Some(other) if other != id && !buffer.contains(&other) => buffer.push(other),
                _ => {}
            }
        }
        log::trace!("entity {id} has {} neighbour(s) {direction}", buffer.len());
    }

    /// Every distinct neighbour in all eight directions, in [`Direction::ALL`] order.
    pub fn all_neighbours(&self, id: EntityId) -> Vec<EntityId> {
        let mut seen = HashSet::new();
        let mut buffer = Vec::new();
        let mut result = Vec::new();
        for direction in Direction::ALL {
            self.neighbours_into(id, direction, &mut buffer);
            result.extend(buffer.iter().filter(|other| seen.insert(**other)));
        }
        result
    }

    /// The occupant of the corner cell in a diagonal direction, if it touches the footprint at that corner only.
    fn corner_neighbour(&self, id: EntityId, rect: &Rect, direction: Direction) -> Option<EntityId> {
        let Rect { min, max } = *rect;
        let corner = match direction {
            Direction::UpLeft    => Coord::new(min.col - 1, max.row + 1),
            Direction::UpRight   => Coord::new(max.col + 1, max.row + 1),
            Direction::DownLeft  => Coord::new(min.col - 1, min.row - 1),
            Direction::DownRight => Coord::new(max.col + 1, min.row - 1),
            _ => return None,
        };

        let other = self.occupant(&corner).filter(|other| *other != id)?;
        let theirs = self.placement(other)?.rect();
        let touches_corner_only = match direction {
            Direction::UpLeft    => theirs.max.col == min.col - 1 && theirs.min.row == max.row + 1,
            Direction::UpRight   => theirs.min.col == max.col + 1 && theirs.min.row == max.row + 1,
            Direction::DownLeft  => theirs.max.col == min.col - 1 && theirs.max.row == min.row - 1,
            Direction::DownRight => theirs.min.col == max.col + 1 && theirs.max.row == min.row - 1,
            _ => false,
        };
        touches_corner_only.then_some(other)
    }

    /// The entity itself followed by each of its neighbours, each exactly once; engine use only.
    pub(super) fn affected_by(&self, id: EntityId) -> Vec<EntityId> {
        let mut affected = vec![id];
        affected.extend(self.all_neighbours(id).into_iter().filter(|other| *other != id));
        affected
    }

    /// Tells each affected entity that its surroundings changed; engine use only.
    pub(super) fn announce_neighbour_changes(&mut self, affected: Vec<EntityId>) -> () {
        log::debug!("neighbourhood of {affected:?} changed on the {} board", self.kind);
        for entity in affected {
            self.events.publish(BoardEvent::NeighboursChanged { board: self.kind, entity });
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::prelude::*;

    fn board_with(columns: i32, rows: i32, pieces: &[(EntityId, i32, i32, i32, i32)]) -> Board {
        let mut b = Board::new(&BoardConfig::rectangle(BoardType::Battle, columns, rows));
        for &(id, col, row, w, h) in pieces {
            let mut p = Placeable::new(id, Footprint::new(w, h));
            b.try_place(&mut p, Coord::new(col, row)).unwrap();
        }
        b
    }

    #[test]
    fn corner_touching_unit_pieces_are_diagonal_only() {
        let b = board_with(3, 3, &[(1, 0, 0, 1, 1), (2, 1, 1, 1, 1)]);
        assert_eq!(b.neighbour(1, Direction::UpRight), Some(2));
        assert_eq!(b.neighbour(2, Direction::DownLeft), Some(1));
        for d in Direction::ORTHOGONAL {
            assert_eq!(b.neighbour(1, d), None);
            assert_eq!(b.neighbour(2, d), None);
        }
        assert_eq!(b.neighbour(1, Direction::UpLeft), None);
        assert_eq!(b.neighbour(2, Direction::UpRight), None);
    }

    #[test]
    fn wide_piece_beside_unit_piece_is_orthogonal_only() {
        let b = board_with(4, 2, &[(1, 0, 0, 2, 1), (2, 2, 0, 1, 1)]);
        assert_eq!(b.neighbour(1, Direction::Right), Some(2));
        assert_eq!(b.neighbour(2, Direction::Left), Some(1));
        for d in Direction::DIAGONAL {
            assert_eq!(b.neighbour(1, d), None);
            assert_eq!(b.neighbour(2, d), None);
        }
    }

    #[test]
    fn edge_adjacent_large_piece_is_not_a_corner_neighbour() {
        // 2 covers (1,1)..(2,2) and meets 1 only at the corner cell (1,1)
        let b = board_with(4, 4, &[(1, 0, 0, 1, 1), (2, 1, 1, 2, 2)]);
        assert_eq!(b.neighbour(1, Direction::UpRight), Some(2));

        // 3 covers (1,0)..(2,1), which includes the down-right corner cell of 4, but it also runs
        // along the right edge of 4
        let b = board_with(4, 4, &[(3, 1, 0, 2, 2), (4, 0, 1, 1, 1)]);
        assert_eq!(b.neighbours(4, Direction::Right), vec![3]);
        assert_eq!(b.neighbour(4, Direction::DownRight), None);
        assert_eq!(b.neighbours(3, Direction::Left), vec![4]);
        assert_eq!(b.all_neighbours(4), vec![3]);
    }

    #[test]
    fn unit_piece_sees_larger_pieces_on_every_diagonal() {
        // a unit piece at (2,2) with a 2x2 piece touching each of its corners
        let corners = [
            (Direction::UpLeft, 2, 0, 3),
            (Direction::UpRight, 3, 3, 3),
            (Direction::DownLeft, 4, 0, 0),
            (Direction::DownRight, 5, 3, 0),
        ];
        let mut pieces = vec![(1, 2, 2, 1, 1)];
        pieces.extend(corners.iter().map(|&(_, id, col, row)| (id, col, row, 2, 2)));
        let b = board_with(5, 5, &pieces);

        for (diagonal, id, _, _) in corners {
            assert_eq!(b.neighbour(1, diagonal), Some(id), "{diagonal} of the unit piece");
            assert_eq!(b.neighbour(id, diagonal.opposite()), Some(1), "{} of piece {id}", diagonal.opposite());
            assert_eq!(b.all_neighbours(id), vec![1]);
        }
        for d in Direction::ORTHOGONAL {
            assert_eq!(b.neighbour(1, d), None, "{d}");
        }
        assert_eq!(b.all_neighbours(1), vec![2, 3, 4, 5]);
    }

    #[test]
    fn larger_piece_sees_unit_pieces_on_every_diagonal() {
        // a 2x2 piece over (2,2)..(3,3) with a unit piece touching each of its corners
        let corners = [
            (Direction::UpLeft, 2, 1, 4),
            (Direction::UpRight, 3, 4, 4),
            (Direction::DownLeft, 4, 1, 1),
            (Direction::DownRight, 5, 4, 1),
        ];
        let mut pieces = vec![(1, 2, 2, 2, 2)];
        pieces.extend(corners.iter().map(|&(_, id, col, row)| (id, col, row, 1, 1)));
        let b = board_with(6, 6, &pieces);

        for (diagonal, id, _, _) in corners {
            assert_eq!(b.neighbour(1, diagonal), Some(id), "{diagonal} of the large piece");
            assert_eq!(b.neighbour(id, diagonal.opposite()), Some(1), "{} of piece {id}", diagonal.opposite());
        }
        for d in Direction::ORTHOGONAL {
            assert!(b.neighbours(1, d).is_empty(), "{d}");
        }
    }

    #[test]
    fn edge_adjacent_pieces_over_a_corner_cell_are_never_diagonal() {
        // each second piece covers the corner cell of the unit piece at (2,2) but also shares an edge
        let cases = [
            (Direction::UpLeft, 1, 3, 2, 1, Direction::Up),
            (Direction::UpRight, 2, 3, 2, 1, Direction::Up),
            (Direction::DownLeft, 1, 1, 1, 2, Direction::Left),
            (Direction::DownRight, 3, 1, 1, 2, Direction::Right),
        ];
        for (diagonal, col, row, w, h, side) in cases {
            let b = board_with(5, 5, &[(1, 2, 2, 1, 1), (2, col, row, w, h)]);
            assert_eq!(b.neighbour(1, diagonal), None, "{diagonal}");
            assert_eq!(b.neighbours(1, side), vec![2], "{diagonal}");
            assert_eq!(b.neighbour(2, diagonal.opposite()), None, "{diagonal}");
            assert_eq!(b.all_neighbours(1), vec![2], "{diagonal}");
        }
    }

    #[test]
    fn long_edges_collect_distinct_neighbours() {
        // a 3x1 bar on the bottom row, with a 2x1 bar and a unit piece resting on it
        let b = board_with(4, 3, &[(1, 0, 0, 3, 1), (2, 0, 1, 2, 1), (3, 2, 1, 1, 1), (4, 3, 0, 1, 3)]);
        assert_eq!(b.neighbours(1, Direction::Up), vec![2, 3]);
        assert_eq!(b.neighbour(1, Direction::Up), Some(2));
        assert_eq!(b.neighbours(1, Direction::Right), vec![4]);
        assert_eq!(b.neighbours(4, Direction::Left), vec![1, 3]);
        assert_eq!(b.neighbours(2, Direction::Down), vec![1]);
        assert!(b.neighbours(1, Direction::Down).is_empty());
    }

    #[test]
    fn all_neighbours_are_deduplicated() {
        // 3 sits above 1; 2 is a 1x2 column to the right of both
        let b = board_with(3, 3, &[(1, 0, 0, 1, 1), (2, 1, 0, 1, 2), (3, 0, 1, 1, 1)]);
        assert_eq!(b.all_neighbours(1), vec![3, 2]);
        assert_eq!(b.neighbours(3, Direction::Right), vec![2]);
    }

    #[test]
    fn unknown_entities_have_no_neighbours() {
        let b = board_with(2, 2, &[(1, 0, 0, 1, 1)]);
        assert!(b.all_neighbours(99).is_empty());
        assert_eq!(b.neighbour(99, Direction::Up), None);
    }

    #[test]
    fn fan_out_touches_each_entity_once() {
        let mut b = board_with(3, 3, &[(1, 0, 0, 3, 1), (2, 0, 2, 3, 1)]);
        let rx = b.subscribe();
        let mut middle = Placeable::new(3, Footprint::new(1, 1));
        b.try_place(&mut middle, Coord::new(1, 1)).unwrap();

        let changed = rx
            .try_iter()
            .filter_map(|e| match e {
                BoardEvent::NeighboursChanged { entity, .. } => Some(entity),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(changed, vec![3, 2, 1]);
    }
}
