use crate::grid::prelude::*;

impl Board {
    /// Whether the footprint anchored at `origin` lies wholly on the board and inside its shape,
    /// whatever state those cells are in.
    pub fn fits_shape(&self, origin: Coord, footprint: Footprint) -> bool {
        if footprint.is_degenerate() {
            return false;
        }
        let rect = Rect::at(origin, footprint);
        rect.within(self.columns, self.rows) && rect.cells().all(|c| self.is_allowed(&c))
    }

    /// Whether every cell of the footprint anchored at `origin` is on the board, inside the shape,
    /// neither locked nor destroyed, and unoccupied. Every placement decision goes through here.
    pub fn is_area_free(&self, origin: Coord, footprint: Footprint) -> bool {
        self.fits_shape(origin, footprint)
            && Rect::at(origin, footprint)
                .cells()
                .all(|c| self.state(&c).is_placeable() && self.occupant(&c).is_none())
    }

    /// Like [`Board::is_area_free`], but says why the area is unusable.
    pub fn check_area(&self, origin: Coord, footprint: Footprint) -> std::result::Result<(), PlacementError> {
        let board = self.kind;
        match (self.fits_shape(origin, footprint), self.is_area_free(origin, footprint)) {
            (_, true)     => Ok(()),
            (false, _)    => Err(PlacementError::OutOfBounds { board, origin, footprint }),
            (true, false) => Err(PlacementError::Blocked { board, origin, footprint }),
        }
    }

    /// Places an unplaced entity with its minimum corner at `origin`.
    ///
    /// On success every covered cell is marked occupied by the entity, the entity is attached to this
    /// board with its anchor at the centre of the footprint, and the placement and neighbour
    /// notifications are published. On failure nothing changes.
    pub fn try_place<E: SpatialEntity + ?Sized>(
        &mut self,
        entity: &mut E,
        origin: Coord,
    ) -> std::result::Result<(), PlacementError> {
        let id = entity.id();
        if let Some(board) = entity.current_board() {
            return Err(PlacementError::AlreadyPlaced { entity: id, board });
        }
        if self.placements.contains_key(&id) {
            return Err(PlacementError::AlreadyPlaced { entity: id, board: self.kind });
        }

        let footprint = entity.footprint();
        self.check_area(origin, footprint)?;

        let anchor = self.occupy(id, origin, footprint);
        entity.attach(self.kind, origin, anchor);
        Ok(())
    }

    /// Records a placement over cells the caller has already vetted, publishes it, and returns the
    /// anchor. Cell states other than occupancy are left alone. The caller attaches the entity.
    pub(super) fn occupy(&mut self, id: EntityId, origin: Coord, footprint: Footprint) -> Vec2 {
        let rect = Rect::at(origin, footprint);
        rect.cells().for_each(|c| self.set_occupant(&c, Some(id)));

        // the midpoint of the corner centres is the centre of the footprint, whatever its parity
        let anchor = self.coord_to_position(&rect.min).midpoint(&self.coord_to_position(&rect.max));
        self.placements.insert(id, Placement { origin, footprint, anchor });
        log::debug!("placed entity {id} ({footprint}) at {origin} on the {} board", self.kind);

        self.events.publish(BoardEvent::Placed { board: self.kind, entity: id, origin, footprint, anchor });
        let affected = self.affected_by(id);
        self.announce_neighbour_changes(affected);
        anchor
    }

    /// Takes an entity off this board. Does nothing (and returns false) if the entity is not here.
    ///
    /// The cells cleared are the ones recorded when the entity was placed, even if its footprint has
    /// changed since.
    pub fn remove<E: SpatialEntity + ?Sized>(&mut self, entity: &mut E) -> bool {
        if entity.current_board() != Some(self.kind) || entity.origin().is_unplaced() {
            return false;
        }
        if self.evict(entity.id()).is_none() {
            log::warn!("entity {} claims the {} board but has no placement on it", entity.id(), self.kind);
            return false;
        }
        entity.detach();
        true
    }

    /// Clears an entity's recorded cells and publishes the removal; engine use only.
    /// The caller is responsible for detaching the entity itself.
    pub(super) fn evict(&mut self, id: EntityId) -> Option<Placement> {
        let placement = *self.placements.get(&id)?;
        let affected = self.affected_by(id);

        placement.rect().cells().for_each(|c| {
            if self.occupant(&c) == Some(id) {
                self.set_occupant(&c, None);
            }
        });
        self.placements.remove(&id);
        log::debug!("removed entity {id} from {} on the {} board", placement.origin, self.kind);

        self.events.publish(BoardEvent::Removed {
            board: self.kind,
            entity: id,
            origin: placement.origin,
            footprint: placement.footprint,
        });
        self.announce_neighbour_changes(affected);
        Some(placement)
    }

    /// Clamps each axis of an origin into `[0, dimension - size]` so the footprint stays on the board.
    pub fn clamp_origin(&self, origin: Coord, footprint: Footprint) -> Coord {
        let max_col = (self.columns - footprint.width).max(0);
        let max_row = (self.rows - footprint.height).max(0);
        Coord::new(origin.col.clamp(0, max_col), origin.row.clamp(0, max_row))
    }

    /// The origin that centres a footprint on the cell under a world position, kept inside the board.
    pub fn snap_world_to_origin(&self, position: &Vec2, footprint: Footprint) -> Coord {
        let under = self.position_to_coord(position);
        let centred = under - Offset::new(footprint.width / 2, footprint.height / 2);
        self.clamp_origin(centred, footprint)
    }

    /// The first origin, scanning rows bottom-up and columns left to right, where the footprint fits.
    pub fn find_free_origin(&self, footprint: Footprint) -> Option<Coord> {
        (0..self.rows)
            .flat_map(|row| (0..self.columns).map(move |col| Coord::new(col, row)))
            .find(|origin| self.is_area_free(*origin, footprint))
    }

    /// The recorded placement of an entity on this board.
    pub fn placement(&self, id: EntityId) -> Option<&Placement> {
        self.placements.get(&id)
    }

    /// Whether an entity is hosted here.
    pub fn hosts(&self, id: EntityId) -> bool {
        self.placements.contains_key(&id)
    }

    /// Every hosted entity and where it is, ordered by id.
    pub fn occupants(&self) -> impl Iterator<Item = (EntityId, &Placement)> {
        self.placements.iter().map(|(id, p)| (*id, p))
    }

    /// The number of cells an entity could still be put on.
    pub fn free_cell_count(&self) -> usize {
        self.allowed.iter().filter(|c| self.state(c).is_placeable()).count()
    }
}
