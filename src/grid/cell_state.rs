bitflags::bitflags! {
    /// The facts known about a single cell on a board. Values combine.
    ///
    /// A cell outside a board's allowed mask carries no flags at all; boards only ever
    /// set the other flags on cells that are `ALLOWED`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CellState: u8 {
        const ALLOWED           = 0b0000_0001;
        const OCCUPIED          = 0b0000_0010;
        const LOCKED            = 0b0000_0100;
        const DESTROYED         = 0b0000_1000;
        const HIGHLIGHT_VALID   = 0b0001_0000;
        const HIGHLIGHT_INVALID = 0b0010_0000;
    }
}

impl CellState {
    /// Flags that keep a cell out of play regardless of occupancy.
    pub const BLOCKING: CellState = CellState::LOCKED.union(CellState::DESTROYED);

    /// Both preview flags.
    pub const HIGHLIGHTS: CellState = CellState::HIGHLIGHT_VALID.union(CellState::HIGHLIGHT_INVALID);

    /// Whether an occupant could be put here.
    pub fn is_placeable(&self) -> bool {
        self.contains(CellState::ALLOWED) && !self.intersects(CellState::BLOCKING | CellState::OCCUPIED)
    }

    /// The state a cell is reset to when a snapshot is applied.
    pub fn bare(&self) -> CellState {
        *self & CellState::ALLOWED
    }
}

impl std::fmt::Display for CellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let glyph = if !self.contains(CellState::ALLOWED) {
            '#'
        } else if self.contains(CellState::DESTROYED) {
            '!'
        } else if self.contains(CellState::LOCKED) {
            'x'
        } else if self.contains(CellState::OCCUPIED) {
            '@'
        } else {
            '.'
        };
        write!(f, "{glyph}")
    }
}
