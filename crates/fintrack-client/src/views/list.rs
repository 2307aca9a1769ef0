use crate::ClientResult;
use crate::models::{RecordId, Session, UserId};
use crate::store::records::{Change, StoredRecord, next_record_id, now_millis};
use crate::store::RecordStore;
use crate::views::form::PendingDelete;

/// A user's collection mirrored in memory, written through the store.
///
/// The mirror is only replaced after the store accepts a write, so a failed
/// write leaves it as it was.
#[derive(Debug)]
pub struct RecordList<'a, S, R> {
    store: &'a S,
    session: Session,
    records: Vec<R>,
    pending_delete: PendingDelete,
}

impl<'a, S, R> RecordList<'a, S, R>
where
    S: RecordStore,
    R: StoredRecord,
{
    pub fn load(store: &'a S, session: &Session) -> ClientResult<Self> {
        let records = store.list(session.user_id)?;
        Ok(Self {
            store,
            session: session.clone(),
            records,
            pending_delete: PendingDelete::default(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user_id(&self) -> UserId {
        self.session.user_id
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn find(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn next_id(&self) -> RecordId {
        next_record_id(&self.records, now_millis())
    }

    pub fn commit(&mut self, change: Change<R>) -> ClientResult<()> {
        let next = self
            .store
            .apply(self.session.user_id, &self.records, &change)?;
        self.records = next;
        Ok(())
    }

    pub fn request_delete(&mut self, id: RecordId) {
        self.pending_delete.request(id);
    }

    pub fn pending_delete(&self) -> Option<RecordId> {
        self.pending_delete.pending()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete.cancel();
    }

    /// Commits the pending delete. `Ok(false)` when nothing was pending or
    /// the record is already gone.
    pub fn confirm_delete(&mut self) -> ClientResult<bool> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(false);
        };
        if self.find(id).is_none() {
            return Ok(false);
        }
        if let Err(error) = self.commit(Change::Delete(id)) {
            self.pending_delete.request(id);
            return Err(error);
        }
        Ok(true)
    }
}
