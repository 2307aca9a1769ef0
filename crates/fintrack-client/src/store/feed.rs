use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::UserId;
use crate::store::records::Collection;

const DEFAULT_CAPACITY: usize = 64;

/// Emitted after a write actually changed a user's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub user_id: UserId,
}

/// Fan-out of record-store writes to whichever views are listening.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ChangeEvent) {
        // No subscribers is not an error.
        let _ = self.sender.send(event);
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
