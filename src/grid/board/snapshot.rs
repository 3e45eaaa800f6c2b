use serde::{Deserialize, Serialize};

use crate::grid::prelude::*;

/// One hosted entity, as captured in a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: EntityId,
    pub origin: Coord,
    pub footprint: Footprint,
}

/// The occupancy and locks of a board, enough to rebuild them on a fresh board of the same size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub columns: i32,
    pub rows: i32,
    pub locked: Vec<Coord>,
    pub occupied: Vec<Coord>,
    pub units: Vec<UnitRecord>,
}

impl Board {
    /// Captures the board's locks and occupants.
    pub fn snapshot(&self) -> BoardSnapshot {
        let columns = self.columns;
        let mut occupied = self.allowed.iter().filter(|c| self.occupant(c).is_some()).copied().collect::<Vec<_>>();
        occupied.sort_by_key(|c| c.row_major(columns));

        BoardSnapshot {
            columns: self.columns,
            rows: self.rows,
            locked: self.locked_cells(),
            occupied,
            units: self
                .occupants()
                .map(|(id, p)| UnitRecord { id, origin: p.origin, footprint: p.footprint })
                .collect(),
        }
    }

    /// Replaces this board's locks and occupants with the snapshot's.
    ///
    /// Every current occupant is removed (and detached, if it is in `entities`), every cell is reset
    /// to bare `ALLOWED`, the snapshot's units are placed again with the footprints they were captured
    /// with, and its locks are replayed over them. A lock may sit under a unit, as partial locking
    /// leaves occupants where they are.
    ///
    /// The whole snapshot is checked before anything changes: each unit must be in `entities`, off
    /// every other board, listed once, inside the board's shape, and clear of the other units.
    pub fn restore<E: SpatialEntity>(
        &mut self,
        snapshot: &BoardSnapshot,
        entities: &mut BTreeMap<EntityId, E>,
    ) -> std::result::Result<(), PlacementError> {
        self.validate_snapshot(snapshot, entities)?;

        let hosted = self.placements.keys().copied().collect::<Vec<_>>();
        for id in hosted {
            self.evict(id);
            if let Some(entity) = entities.get_mut(&id) {
                entity.detach();
            }
        }
        self.states.iter_mut().for_each(|s| *s = s.bare());

        for unit in &snapshot.units {
            let Some(entity) = entities.get_mut(&unit.id) else {
                continue;
            };
            if entity.footprint() != unit.footprint {
                log::debug!(
                    "entity {} is {} now but was captured as {}; restoring the captured footprint",
                    unit.id,
                    entity.footprint(),
                    unit.footprint
                );
            }
            let anchor = self.occupy(unit.id, unit.origin, unit.footprint);
            entity.attach(self.kind, unit.origin, anchor);
        }
        snapshot.locked.iter().for_each(|c| {
            self.lock_cell(c);
        });

        log::info!(
            "restored the {} board: {} lock(s), {} unit(s)",
            self.kind,
            snapshot.locked.len(),
            snapshot.units.len()
        );
        Ok(())
    }

    /// Everything that could make [`Board::restore`] fail part way.
    fn validate_snapshot<E: SpatialEntity>(
        &self,
        snapshot: &BoardSnapshot,
        entities: &BTreeMap<EntityId, E>,
    ) -> std::result::Result<(), PlacementError> {
        let board = self.kind;
        if (snapshot.columns, snapshot.rows) != (self.columns, self.rows) {
            return Err(PlacementError::SnapshotMismatch {
                board,
                expected: (self.columns, self.rows),
                found: (snapshot.columns, snapshot.rows),
            });
        }

        let mut seen = BTreeSet::new();
        let mut covered = BTreeSet::new();
        for UnitRecord { id, origin, footprint } in snapshot.units.iter().copied() {
            let entity = entities.get(&id).ok_or(PlacementError::UnknownEntity { entity: id })?;
            match entity.current_board() {
                Some(other) if other != board => return Err(PlacementError::AlreadyPlaced { entity: id, board: other }),
                _ => {}
            }
            if !seen.insert(id) {
                return Err(PlacementError::AlreadyPlaced { entity: id, board });
            }
            if !self.fits_shape(origin, footprint) {
                return Err(PlacementError::OutOfBounds { board, origin, footprint });
            }
            if Rect::at(origin, footprint).cells().any(|c| !covered.insert(c)) {
                return Err(PlacementError::Blocked { board, origin, footprint });
            }
        }
        Ok(())
    }
}
