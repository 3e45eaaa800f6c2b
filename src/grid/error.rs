use thiserror::Error as ThisError;

use super::{consts::BoardType, coords::{Coord, Footprint}, entity::EntityId};

/// Why a board refused to change.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PlacementError {
    #[error("a {footprint} footprint at {origin} does not fit inside the {board} board")]
    OutOfBounds {
        board: BoardType,
        origin: Coord,
        footprint: Footprint,
    },
    #[error("a {footprint} footprint at {origin} on the {board} board covers a locked, destroyed or occupied cell")]
    Blocked {
        board: BoardType,
        origin: Coord,
        footprint: Footprint,
    },
    #[error("entity {entity} is already placed on the {board} board")]
    AlreadyPlaced { entity: EntityId, board: BoardType },
    #[error("entity {entity} is not placed on the {board} board")]
    NotOnBoard { entity: EntityId, board: BoardType },
    #[error("entity {entity} is unknown")]
    UnknownEntity { entity: EntityId },
    #[error("no {board} board is registered")]
    UnknownBoard { board: BoardType },
    #[error("none of the boards {boards:?} has room for entity {entity}")]
    NoRoom { entity: EntityId, boards: Vec<BoardType> },
    #[error("snapshot is {found:?} but the {board} board is {expected:?}")]
    SnapshotMismatch {
        board: BoardType,
        expected: (i32, i32),
        found: (i32, i32),
    },
}
