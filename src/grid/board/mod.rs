pub(crate) mod indexing;
pub(crate) mod locking;
pub(crate) mod neighbours;
pub(crate) mod placement;
pub(crate) mod pretty;
pub(crate) mod snapshot;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};

use super::prelude::*;

pub use snapshot::{BoardSnapshot, UnitRecord};

fn default_cell_size() -> f32 {
    1.0
}

/// Everything needed to build a board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub kind: BoardType,
    pub columns: i32,
    pub rows: i32,
    #[serde(default)]
    pub shape: BoardShape,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default)]
    pub cell_gap: f32,
    /// World position of the outer corner of cell (0, 0).
    #[serde(default)]
    pub origin: Vec2,
    #[serde(default)]
    pub locked_percent: f64,
    #[serde(default)]
    pub lock_from_end: bool,
}

impl BoardConfig {
    /// A plain rectangular board with unit cells and nothing locked.
    pub fn rectangle(kind: BoardType, columns: i32, rows: i32) -> BoardConfig {
        BoardConfig {
            kind,
            columns,
            rows,
            shape: BoardShape::Rectangle,
            cell_size: default_cell_size(),
            cell_gap: 0.0,
            origin: Vec2::ZERO,
            locked_percent: 0.0,
            lock_from_end: false,
        }
    }

    pub fn with_shape(mut self, shape: BoardShape) -> BoardConfig {
        self.shape = shape;
        self
    }

    pub fn with_spacing(mut self, cell_size: f32, cell_gap: f32) -> BoardConfig {
        self.cell_size = cell_size;
        self.cell_gap = cell_gap;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> BoardConfig {
        self.origin = origin;
        self
    }

    pub fn with_locking(mut self, locked_percent: f64, lock_from_end: bool) -> BoardConfig {
        self.locked_percent = locked_percent;
        self.lock_from_end = lock_from_end;
        self
    }
}

/// Where a board put an entity, as recorded at placement time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub origin: Coord,
    pub footprint: Footprint,
    pub anchor: Vec2,
}

impl Placement {
    /// The cells covered.
    pub fn rect(&self) -> Rect {
        Rect::at(self.origin, self.footprint)
    }
}

/// A fixed-size grid of cells hosting multi-cell entities.
#[derive(Debug)]
pub struct Board {
    /// The registry key of this board.
    kind: BoardType,

    columns: i32,
    rows: i32,

    /// Position mapping only; none of the occupancy logic depends on these.
    cell_size: f32,
    cell_gap: f32,
    origin: Vec2,

    /// The coordinates this board's shape makes usable.
    allowed: BTreeSet<Coord>,

    /// Row-major cell states.
    states: Vec<CellState>,

    /// Row-major occupant ids, kept in lock-step with the `OCCUPIED` flag in `states`.
    occupants: Vec<Option<EntityId>>,

    /// Where each hosted entity was put, by id.
    placements: BTreeMap<EntityId, Placement>,

    events: EventBus,
}

impl Board {
    /// Builds a board: computes the shape mask, marks it allowed, then applies the configured partial lock.
    pub fn new(config: &BoardConfig) -> Board {
        let [columns, rows] = [config.columns.max(0), config.rows.max(0)];
        let area = (columns as usize) * (rows as usize);
        let allowed = config.shape.allowed_mask(columns, rows);

        let mut board = Board {
            kind: config.kind,
            columns,
            rows,
            cell_size: config.cell_size,
            cell_gap: config.cell_gap,
            origin: config.origin,
            allowed,
            states: vec![CellState::empty(); area],
            occupants: vec![None; area],
            placements: BTreeMap::new(),
            events: EventBus::default(),
        };
        for coord in board.allowed.clone() {
            board.insert_flags(&coord, CellState::ALLOWED);
        }
        if config.locked_percent > 0.0 {
            board.apply_partial_lock(config.locked_percent, config.lock_from_end);
        }

        log::debug!(
            "built {} board: {}x{} {} with {} allowed cell(s)",
            board.kind,
            columns,
            rows,
            config.shape.notate(),
            board.allowed.len()
        );
        board
    }

    pub fn kind(&self) -> BoardType {
        self.kind
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cell_gap(&self) -> f32 {
        self.cell_gap
    }

    /// The usable coordinates.
    pub fn allowed(&self) -> &BTreeSet<Coord> {
        &self.allowed
    }

    pub fn allowed_count(&self) -> usize {
        self.allowed.len()
    }

    /// Subscribes to this board's placement notifications.
    pub fn subscribe(&mut self) -> Receiver<BoardEvent> {
        self.events.subscribe()
    }
}
