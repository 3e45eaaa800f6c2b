use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::grid::prelude::*;

/// A notification raised by a board at the end of a successful mutating call.
#[derive(Clone, Debug, PartialEq)]
pub enum BoardEvent {
    Placed {
        board: BoardType,
        entity: EntityId,
        origin: Coord,
        footprint: Footprint,
        anchor: Vec2,
    },
    Removed {
        board: BoardType,
        entity: EntityId,
        origin: Coord,
        footprint: Footprint,
    },
    /// Raised once per affected entity after a placement or removal next to (or of) it.
    NeighboursChanged {
        board: BoardType,
        entity: EntityId,
    },
}

impl BoardEvent {
    /// The entity this event is about.
    pub fn entity(&self) -> EntityId {
        match self {
            BoardEvent::Placed { entity, .. }
            | BoardEvent::Removed { entity, .. }
            | BoardEvent::NeighboursChanged { entity, .. } => *entity,
        }
    }

    /// The board that raised this event.
    pub fn board(&self) -> BoardType {
        match self {
            BoardEvent::Placed { board, .. }
            | BoardEvent::Removed { board, .. }
            | BoardEvent::NeighboursChanged { board, .. } => *board,
        }
    }
}

/// The subscriber list of a board.
///
/// Every event goes to every live subscriber, in subscription order, before the mutating call returns.
/// Subscribers only ever see events through their receivers, so they cannot call back into the board
/// while it is mid-mutation; anything they do in response happens after the call has completed.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<BoardEvent>>,
}

impl EventBus {
    /// Adds a subscriber.
    pub fn subscribe(&mut self) -> Receiver<BoardEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Delivers an event, dropping any subscriber whose receiver has gone away.
    pub fn publish(&mut self, event: BoardEvent) -> () {
        log::trace!("publishing {event:?} to {} subscriber(s)", self.subscribers.len());
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// The number of live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
