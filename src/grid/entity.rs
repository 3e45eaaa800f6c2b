use crate::grid::prelude::*;

/// The identity boards record in their occupant matrices.
pub type EntityId = u64;

/// The capability a board needs from anything it hosts.
///
/// Boards are the only callers of [`SpatialEntity::attach`] and [`SpatialEntity::detach`]; an entity is
/// attached to at most one board at a time, and must be removed from it before being placed elsewhere.
pub trait SpatialEntity {
    fn id(&self) -> EntityId;

    /// The current footprint, which may have changed (e.g. by rotation) since the entity was placed.
    fn footprint(&self) -> Footprint;

    /// The minimum corner of the footprint, or [`Coord::UNPLACED`].
    fn origin(&self) -> Coord;

    fn current_board(&self) -> Option<BoardType>;

    /// Records a successful placement.
    fn attach(&mut self, board: BoardType, origin: Coord, anchor: Vec2);

    /// Clears the placement back to the unplaced sentinel.
    fn detach(&mut self);

    /// Whether the entity currently sits on some board.
    fn is_placed(&self) -> bool {
        self.current_board().is_some() && !self.origin().is_unplaced()
    }
}

/// A plain entity with a rotatable footprint.
#[derive(Clone, Debug, PartialEq)]
pub struct Placeable {
    id: EntityId,
    footprint: Footprint,
    board: Option<BoardType>,
    origin: Coord,
    anchor: Option<Vec2>,
}

impl Placeable {
    /// Constructs a new, unplaced entity.
    pub fn new(id: EntityId, footprint: Footprint) -> Placeable {
        Placeable { id, footprint, board: None, origin: Coord::UNPLACED, anchor: None }
    }

    /// Swaps width and height. A placed entity keeps its recorded cells until it is re-placed.
    pub fn rotate(&mut self) -> &mut Self {
        self.footprint = self.footprint.rotated();
        self
    }

    /// The world position of the centre of the footprint, while placed.
    pub fn anchor(&self) -> Option<Vec2> {
        self.anchor
    }
}

impl SpatialEntity for Placeable {
    fn id(&self) -> EntityId {
        self.id
    }

    fn footprint(&self) -> Footprint {
        self.footprint
    }

    fn origin(&self) -> Coord {
        self.origin
    }

    fn current_board(&self) -> Option<BoardType> {
        self.board
    }

    fn attach(&mut self, board: BoardType, origin: Coord, anchor: Vec2) {
        self.board = Some(board);
        self.origin = origin;
        self.anchor = Some(anchor);
    }

    fn detach(&mut self) {
        self.board = None;
        self.origin = Coord::UNPLACED;
        self.anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_and_detach() {
        let mut p = Placeable::new(7, Footprint::new(2, 1));
        assert!(!p.is_placed());
        assert_eq!(p.origin(), Coord::UNPLACED);

        p.attach(BoardType::Bench, Coord::new(1, 0), Vec2::new(2.0, 0.5));
        assert!(p.is_placed());
        assert_eq!(p.current_board(), Some(BoardType::Bench));
        assert_eq!(p.anchor(), Some(Vec2::new(2.0, 0.5)));

        p.detach();
        assert!(!p.is_placed());
        assert_eq!(p.anchor(), None);
    }

    #[test]
    fn rotation_swaps_sides() {
        let mut p = Placeable::new(1, Footprint::new(3, 1));
        p.rotate();
        assert_eq!(p.footprint(), Footprint::new(1, 3));
    }
}
