pub mod database;
pub mod feed;
pub mod kv;
pub mod local;
pub mod records;
pub mod tables;

use tokio::sync::broadcast;

use crate::ClientResult;
use crate::models::UserId;

pub use database::Database;
pub use feed::{ChangeEvent, ChangeFeed};
pub use kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use local::LocalRecordStore;
pub use records::{Change, Collection, StoredRecord};
pub use tables::TableRecordStore;

/// Per-user persistence for transactions, budgets and goals.
pub trait RecordStore {
    /// Loads the user's collection. Entries that fail validation are dropped.
    fn list<R: StoredRecord>(&self, user_id: UserId) -> ClientResult<Vec<R>>;

    /// Persists `change` and returns the collection as it now stands.
    ///
    /// `current` is the caller's mirror of the collection. A change that
    /// matches nothing writes nothing and publishes nothing.
    fn apply<R: StoredRecord>(
        &self,
        user_id: UserId,
        current: &[R],
        change: &Change<R>,
    ) -> ClientResult<Vec<R>>;

    /// Creates an empty collection for a freshly registered user.
    fn ensure_collection(&self, user_id: UserId, collection: Collection) -> ClientResult<()>;

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
