// Entity change notifications, fanned out to any interested listener

use serde::Serialize;
use tokio::sync::broadcast;

use crate::types::ChangeAction;

const CHANNEL_CAPACITY: usize = 256;

/// A successful write to one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityChange {
    pub entity: &'static str,
    pub id: i64,
    pub action: ChangeAction,
}

impl EntityChange {
    pub fn new(entity: &'static str, id: i64, action: ChangeAction) -> Self {
        Self { entity, id, action }
    }
}

/// Broadcast bus for [`EntityChange`] events.
///
/// Publishing never fails the caller: with no subscribers the event is
/// dropped, and slow subscribers see `Lagged` instead of blocking writes.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<EntityChange>,
}

impl ChangeBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EntityChange> {
        self.sender.subscribe()
    }

    pub fn publish(&self, change: EntityChange) {
        tracing::info!(
            entity = change.entity,
            id = change.id,
            action = change.action.verb(),
            "entity {}",
            change.action.verb()
        );
        let _ = self.sender.send(change);
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}
