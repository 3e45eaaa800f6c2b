use indexmap::IndexMap;

use crate::grid::prelude::*;

/// The boards of one session, keyed by type and kept in registration order.
///
/// A registry is created per session and handed to whatever needs to look boards up or move entities
/// between them; there is no process-wide instance.
#[derive(Debug, Default)]
pub struct BoardRegistry {
    boards: IndexMap<BoardType, Board>,
}

impl BoardRegistry {
    pub fn new() -> BoardRegistry {
        BoardRegistry::default()
    }

    /// Registers a board under its type, handing back any board it replaces. A replacement keeps the
    /// registration position of the board it replaces.
    pub fn register(&mut self, board: Board) -> Option<Board> {
        let kind = board.kind();
        let previous = self.boards.insert(kind, board);
        log::debug!("registered the {kind} board{}", if previous.is_some() { " (replacing)" } else { "" });
        previous
    }

    /// Unregisters the board of the given type, if any.
    pub fn unregister(&mut self, kind: BoardType) -> Option<Board> {
        let removed = self.boards.shift_remove(&kind);
        if removed.is_some() {
            log::debug!("unregistered the {kind} board");
        }
        removed
    }

    pub fn get(&self, kind: BoardType) -> Option<&Board> {
        self.boards.get(&kind)
    }

    pub fn get_mut(&mut self, kind: BoardType) -> Option<&mut Board> {
        self.boards.get_mut(&kind)
    }

    /// Like [`BoardRegistry::get_mut`], but unknown boards are an error.
    pub fn require_mut(&mut self, kind: BoardType) -> std::result::Result<&mut Board, PlacementError> {
        self.boards.get_mut(&kind).ok_or(PlacementError::UnknownBoard { board: kind })
    }

    pub fn contains(&self, kind: BoardType) -> bool {
        self.boards.contains_key(&kind)
    }

    /// The registered boards, in registration order.
    pub fn boards(&self) -> impl Iterator<Item = &Board> {
        self.boards.values()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// The first board, in registration order, with a usable cell under the position.
    pub fn board_at_position(&self, position: &Vec2) -> Option<&Board> {
        self.boards.values().find(|b| b.contains_position(position))
    }

    /// Moves an entity to `origin` on the `target` board, from wherever it currently is.
    ///
    /// The target area is checked before the entity leaves its current board. If placing it on the
    /// target still fails, the entity is put back where it was, so a failed move never leaves it unplaced
    /// (unless it started unplaced). Moving within one board is allowed, including onto cells it covers now.
    pub fn move_to_board<E: SpatialEntity + ?Sized>(
        &mut self,
        entity: &mut E,
        target: BoardType,
        origin: Coord,
    ) -> std::result::Result<(), PlacementError> {
        if !self.contains(target) {
            return Err(PlacementError::UnknownBoard { board: target });
        }
        let Some(source) = entity.current_board().filter(|_| entity.is_placed()) else {
            return self.require_mut(target)?.try_place(entity, origin);
        };
        let previous = entity.origin();

        if source != target {
            self.require_mut(target)?.check_area(origin, entity.footprint())?;
        }

        let source_board = self.require_mut(source)?;
        if !source_board.remove(entity) {
            return Err(PlacementError::NotOnBoard { entity: entity.id(), board: source });
        }

        match self.require_mut(target)?.try_place(entity, origin) {
            Ok(()) => {
                log::debug!("moved entity {} from {source} {previous} to {target} {origin}", entity.id());
                Ok(())
            }
            Err(err) => {
                if let Err(restore) = self.require_mut(source)?.try_place(entity, previous) {
                    log::warn!("entity {} could not be put back on the {source} board: {restore}", entity.id());
                }
                Err(err)
            }
        }
    }
}
