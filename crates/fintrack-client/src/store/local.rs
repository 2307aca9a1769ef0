use tokio::sync::broadcast;

use crate::ClientResult;
use crate::models::UserId;
use crate::store::feed::{ChangeEvent, ChangeFeed};
use crate::store::kv::{KeyValueStore, read_collection, write_json};
use crate::store::records::{Change, Collection, StoredRecord};
use crate::store::RecordStore;

/// Whole collections serialized as JSON arrays under `{collection}_{user_id}`.
#[derive(Debug)]
pub struct LocalRecordStore<K> {
    kv: K,
    feed: ChangeFeed,
}

impl<K: KeyValueStore> LocalRecordStore<K> {
    pub fn new(kv: K, feed: ChangeFeed) -> Self {
        Self { kv, feed }
    }
}

impl<K: KeyValueStore> RecordStore for LocalRecordStore<K> {
    fn list<R: StoredRecord>(&self, user_id: UserId) -> ClientResult<Vec<R>> {
        read_collection(&self.kv, &R::COLLECTION.storage_key(user_id))
    }

    fn apply<R: StoredRecord>(
        &self,
        user_id: UserId,
        current: &[R],
        change: &Change<R>,
    ) -> ClientResult<Vec<R>> {
        let mut next = current.to_vec();
        if !change.apply_to(&mut next) {
            tracing::debug!(
                collection = %R::COLLECTION,
                user_id,
                id = change.target_id(),
                "change matched no record"
            );
            return Ok(next);
        }

        let key = R::COLLECTION.storage_key(user_id);
        if let Err(error) = write_json(&self.kv, &key, &next) {
            tracing::warn!(key = %key, code = %error.code, "collection write failed");
            return Err(error);
        }

        self.feed.publish(ChangeEvent {
            collection: R::COLLECTION,
            user_id,
        });
        Ok(next)
    }

    fn ensure_collection(&self, user_id: UserId, collection: Collection) -> ClientResult<()> {
        let key = collection.storage_key(user_id);
        if self.kv.get(&key)?.is_none() {
            self.kv.set(&key, "[]")?;
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }
}
