/*
 *  Occupancy bookkeeping and spatial queries for multi-cell entities on discrete boards.
 */

pub mod autoplace;
pub(crate) mod board;
pub mod cell_state;
pub mod config;
pub mod consts;
pub mod coords;
pub mod effects;
pub mod entity;
pub mod error;
pub mod events;
pub mod notation;
pub mod registry;
pub mod shape;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        autoplace::{try_place_in_order, AutoPlacer},
        board::{Board, BoardConfig, BoardSnapshot, Placement, UnitRecord},
        cell_state::CellState,
        config::SessionConfig,
        consts::*,
        coords::{self, *},
        effects::CellEffectMap,
        entity::{EntityId, Placeable, SpatialEntity},
        error::PlacementError,
        events::{BoardEvent, EventBus},
        registry::BoardRegistry,
        shape::BoardShape,
    };
}
