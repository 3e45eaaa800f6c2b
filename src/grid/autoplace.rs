use crate::grid::prelude::*;

/// Places an unplaced entity on the first board in `order` with room for it.
///
/// Each board that resolves in the registry is scanned row-major for a free origin and, if one is
/// found, gets exactly one placement attempt; a board that refuses is not retried. Returns the board
/// that took the entity, or `None` once the list is exhausted, in which case the entity is left unplaced.
pub fn try_place_in_order<E: SpatialEntity + ?Sized>(
    registry: &mut BoardRegistry,
    entity: &mut E,
    order: &[BoardType],
) -> Option<BoardType> {
    for &kind in order {
        let Some(board) = registry.get_mut(kind) else {
            log::trace!("skipping the {kind} board: not registered");
            continue;
        };
        let Some(origin) = board.find_free_origin(entity.footprint()) else {
            log::trace!("no room for entity {} on the {kind} board", entity.id());
            continue;
        };
        match board.try_place(entity, origin) {
            Ok(()) => return Some(kind),
            Err(err) => log::debug!("auto-placement on the {kind} board failed: {err}"),
        }
    }
    None
}

/// An auto-placement policy: a preferred board order, with an optional last-resort board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AutoPlacer {
    order: Vec<BoardType>,
    overflow: Option<BoardType>,
}

impl AutoPlacer {
    pub fn new(order: Vec<BoardType>) -> AutoPlacer {
        AutoPlacer { order, overflow: None }
    }

    /// Sends entities that fit nowhere in the preferred order to `board`.
    pub fn with_overflow(mut self, board: BoardType) -> AutoPlacer {
        self.overflow = Some(board);
        self
    }

    /// Adds a board to the end of the preferred order, ahead of the overflow, unless it is already a candidate.
    pub fn append(&mut self, board: BoardType) -> () {
        if !self.candidates().contains(&board) {
            self.order.push(board);
        }
    }

    /// The boards tried, in order, overflow last.
    pub fn candidates(&self) -> Vec<BoardType> {
        self.order.iter().copied().chain(self.overflow.filter(|o| !self.order.contains(o))).collect()
    }

    /// Places the entity on the first candidate with room.
    pub fn place<E: SpatialEntity + ?Sized>(
        &self,
        registry: &mut BoardRegistry,
        entity: &mut E,
    ) -> std::result::Result<BoardType, PlacementError> {
        if let Some(board) = entity.current_board() {
            return Err(PlacementError::AlreadyPlaced { entity: entity.id(), board });
        }
        let candidates = self.candidates();
        match try_place_in_order(registry, entity, &candidates) {
            Some(kind) => {
                log::debug!("auto-placed entity {} on the {kind} board", entity.id());
                Ok(kind)
            }
            None => Err(PlacementError::NoRoom { entity: entity.id(), boards: candidates }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BoardRegistry {
        let mut r = BoardRegistry::new();
        r.register(Board::new(&BoardConfig::rectangle(BoardType::Battle, 2, 1)));
        r.register(Board::new(&BoardConfig::rectangle(BoardType::Bench, 3, 1)));
        r.register(Board::new(&BoardConfig::rectangle(BoardType::Overflow, 8, 8)));
        r
    }

    fn fill(r: &mut BoardRegistry, kind: BoardType, first_id: EntityId) {
        let board = r.get_mut(kind).unwrap();
        let mut id = first_id;
        while let Some(origin) = board.find_free_origin(Footprint::UNIT) {
            board.try_place(&mut Placeable::new(id, Footprint::UNIT), origin).unwrap();
            id += 1;
        }
    }

    #[test]
    fn first_board_with_room_wins() {
        let mut r = registry();
        fill(&mut r, BoardType::Battle, 100);

        let mut p = Placeable::new(1, Footprint::new(2, 1));
        assert_eq!(try_place_in_order(&mut r, &mut p, &[BoardType::Battle, BoardType::Bench]), Some(BoardType::Bench));
        assert_eq!(p.origin(), Coord::new(0, 0));

        let mut q = Placeable::new(2, Footprint::UNIT);
        assert_eq!(try_place_in_order(&mut r, &mut q, &[BoardType::Battle, BoardType::Bench]), Some(BoardType::Bench));
        assert_eq!(q.origin(), Coord::new(2, 0));
    }

    #[test]
    fn all_full_leaves_the_entity_unplaced() {
        let mut r = registry();
        fill(&mut r, BoardType::Battle, 100);
        fill(&mut r, BoardType::Bench, 200);

        let mut p = Placeable::new(1, Footprint::UNIT);
        assert_eq!(try_place_in_order(&mut r, &mut p, &[BoardType::Battle, BoardType::Bench]), None);
        assert!(!p.is_placed());
        assert_eq!(try_place_in_order(&mut r, &mut p, &[]), None);
    }

    #[test]
    fn unregistered_boards_are_skipped() {
        let mut r = registry();
        let mut p = Placeable::new(1, Footprint::UNIT);
        assert_eq!(try_place_in_order(&mut r, &mut p, &[BoardType::Shop, BoardType::Bench]), Some(BoardType::Bench));
    }

    #[test]
    fn too_large_for_every_board() {
        let mut r = registry();
        let mut p = Placeable::new(1, Footprint::new(4, 2));
        assert_eq!(try_place_in_order(&mut r, &mut p, &[BoardType::Battle, BoardType::Bench]), None);
    }

    #[test]
    fn placer_falls_back_to_overflow() {
        let mut r = registry();
        fill(&mut r, BoardType::Bench, 100);
        let placer = AutoPlacer::new(vec![BoardType::Bench]).with_overflow(BoardType::Overflow);
        assert_eq!(placer.candidates(), vec![BoardType::Bench, BoardType::Overflow]);
        let mut extended = placer.clone();
        extended.append(BoardType::Battle);
        extended.append(BoardType::Overflow);
        assert_eq!(extended.candidates(), vec![BoardType::Bench, BoardType::Battle, BoardType::Overflow]);

        let mut p = Placeable::new(1, Footprint::new(2, 2));
        assert_eq!(placer.place(&mut r, &mut p), Ok(BoardType::Overflow));
        assert_eq!(
            placer.place(&mut r, &mut p),
            Err(PlacementError::AlreadyPlaced { entity: 1, board: BoardType::Overflow })
        );

        let strict = AutoPlacer::new(vec![BoardType::Bench]);
        let mut q = Placeable::new(2, Footprint::UNIT);
        assert_eq!(
            strict.place(&mut r, &mut q),
            Err(PlacementError::NoRoom { entity: 2, boards: vec![BoardType::Bench] })
        );
    }
}
