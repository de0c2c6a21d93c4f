use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Notifications broadcast by [`Game`] after it processes a command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TokenMoved { from: Coord2, to: Coord2 },
    /// Occupancy or blockage of a cell changed.
    CellStateChanged { cell: Coord2 },
    ObstructionApplied { cell: Coord2, kind: ObstructionKind },
    SelectionChanged { old: ObstructionKind, new: ObstructionKind },
    StatusChanged { status: GameStatus },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(u32);

type Subscriber = Box<dyn FnMut(&GameEvent)>;

/// Ordered list of event callbacks. Delivery is synchronous and follows
/// subscription order.
#[derive(Default)]
pub(crate) struct EventBus {
    next_id: u32,
    subscribers: Vec<(SubscriberId, Subscriber)>,
}

impl EventBus {
    pub(crate) fn subscribe(&mut self, callback: Subscriber) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscriber, _)| *subscriber != id);
        self.subscribers.len() != before
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
