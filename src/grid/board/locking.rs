use crate::grid::prelude::*;

impl Board {
    /// Locks a fixed share of the allowed cells, replacing any earlier locks.
    ///
    /// `floor(allowed * locked_percent)` cells are locked, taken in row-major order from the start of
    /// the board, or from its end if `lock_from_end` is set. The result depends on nothing else, so the
    /// same configuration always locks the same cells. Returns the number of cells locked.
    pub fn apply_partial_lock(&mut self, locked_percent: f64, lock_from_end: bool) -> usize {
        let percent = locked_percent.clamp(0.0, 1.0);
        let to_lock = (self.allowed.len() as f64 * percent).floor() as usize;

        let columns = self.columns;
        let mut order = self.allowed.iter().copied().collect::<Vec<_>>();
        order.sort_by_key(|c| c.row_major(columns));
        if lock_from_end {
            order.reverse();
        }

        self.unlock_all();
        order.iter().take(to_lock).for_each(|c| self.insert_flags(c, CellState::LOCKED));
        log::debug!(
            "locked {to_lock} of {} cell(s) on the {} board from the {}",
            self.allowed.len(),
            self.kind,
            if lock_from_end { "end" } else { "start" }
        );
        to_lock
    }

    /// Locks a single allowed cell. Returns whether the cell is in the mask.
    pub fn lock_cell(&mut self, coord: &Coord) -> bool {
        self.update_allowed(coord, |state| state.insert(CellState::LOCKED))
    }

    /// Unlocks a single allowed cell. Returns whether the cell is in the mask.
    pub fn unlock_cell(&mut self, coord: &Coord) -> bool {
        self.update_allowed(coord, |state| state.remove(CellState::LOCKED))
    }

    /// Marks a single allowed cell destroyed. Returns whether the cell is in the mask.
    pub fn destroy_cell(&mut self, coord: &Coord) -> bool {
        self.update_allowed(coord, |state| state.insert(CellState::DESTROYED))
    }

    /// Restores a destroyed cell. Returns whether the cell is in the mask.
    pub fn repair_cell(&mut self, coord: &Coord) -> bool {
        self.update_allowed(coord, |state| state.remove(CellState::DESTROYED))
    }

    /// Unlocks every cell.
    pub fn unlock_all(&mut self) -> () {
        self.states.iter_mut().for_each(|s| s.remove(CellState::LOCKED));
    }

    /// Every locked cell, in row-major order.
    pub fn locked_cells(&self) -> Vec<Coord> {
        self.cells_with(CellState::LOCKED)
    }

    /// Every destroyed cell, in row-major order.
    pub fn destroyed_cells(&self) -> Vec<Coord> {
        self.cells_with(CellState::DESTROYED)
    }

    /// Paints a drag preview: the in-mask cells under the footprint are highlighted valid if the
    /// footprint could be placed there, and invalid otherwise. Earlier highlights are cleared first.
    pub fn paint_preview(&mut self, origin: Coord, footprint: Footprint) -> bool {
        self.clear_highlights();
        let valid = self.is_area_free(origin, footprint);
        let paint = if valid { CellState::HIGHLIGHT_VALID } else { CellState::HIGHLIGHT_INVALID };
        let covered = Rect::at(origin, footprint)
            .clip(self.columns, self.rows)
            .into_iter()
            .flat_map(|rect| rect.cells())
            .filter(|c| self.allowed.contains(c))
            .collect::<Vec<_>>();
        covered.iter().for_each(|c| self.insert_flags(c, paint));
        valid
    }

    /// Removes every preview highlight.
    pub fn clear_highlights(&mut self) -> () {
        self.states.iter_mut().for_each(|s| s.remove(CellState::HIGHLIGHTS));
    }

    /// Applies a state change to a cell in the allowed mask; cells outside the mask are never touched.
    fn update_allowed(&mut self, coord: &Coord, update: impl FnOnce(&mut CellState)) -> bool {
        if !self.allowed.contains(coord) {
            return false;
        }
        match self.index(coord) {
            Some(i) => {
                update(&mut self.states[i]);
                true
            }
            None => false,
        }
    }

    fn cells_with(&self, flags: CellState) -> Vec<Coord> {
        let columns = self.columns;
        let mut cells = self
            .allowed
            .iter()
            .filter(|c| self.state(c).contains(flags))
            .copied()
            .collect::<Vec<_>>();
        cells.sort_by_key(|c| c.row_major(columns));
        cells
    }
}
