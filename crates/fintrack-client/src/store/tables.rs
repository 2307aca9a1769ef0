use std::rc::Rc;

use rusqlite::params_from_iter;
use rusqlite::types::Value;
use tokio::sync::broadcast;

use crate::ClientResult;
use crate::models::UserId;
use crate::store::database::Database;
use crate::store::feed::{ChangeEvent, ChangeFeed};
use crate::store::records::{Change, Collection, StoredRecord};
use crate::store::RecordStore;

/// One typed table per collection, partitioned by `user_id`.
#[derive(Debug)]
pub struct TableRecordStore {
    db: Rc<Database>,
    feed: ChangeFeed,
}

impl TableRecordStore {
    pub fn new(db: Rc<Database>, feed: ChangeFeed) -> Self {
        Self { db, feed }
    }

    fn select_sql<R: StoredRecord>() -> String {
        format!(
            "SELECT id, {} FROM {} WHERE user_id = ?1 ORDER BY {}",
            R::COLUMNS.join(", "),
            R::COLLECTION.as_str(),
            R::ORDER_BY
        )
    }

    fn insert_sql<R: StoredRecord>() -> String {
        let placeholders = (0..R::COLUMNS.len())
            .map(|offset| format!("?{}", offset + 3))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} (user_id, id, {}) VALUES (?1, ?2, {placeholders})",
            R::COLLECTION.as_str(),
            R::COLUMNS.join(", ")
        )
    }

    fn update_sql<R: StoredRecord>() -> String {
        let assignments = R::COLUMNS
            .iter()
            .enumerate()
            .map(|(offset, column)| format!("{column} = ?{}", offset + 3))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {assignments} WHERE user_id = ?1 AND id = ?2",
            R::COLLECTION.as_str()
        )
    }

    fn delete_sql<R: StoredRecord>() -> String {
        format!(
            "DELETE FROM {} WHERE user_id = ?1 AND id = ?2",
            R::COLLECTION.as_str()
        )
    }

    fn execute<R: StoredRecord>(&self, user_id: UserId, change: &Change<R>) -> ClientResult<usize> {
        let (sql, mut values) = match change {
            Change::Insert(record) => (Self::insert_sql::<R>(), record.column_values()),
            Change::Update(record) => (Self::update_sql::<R>(), record.column_values()),
            Change::Delete(_) => (Self::delete_sql::<R>(), Vec::new()),
        };
        let mut bound = vec![Value::Integer(user_id), Value::Integer(change.target_id())];
        bound.append(&mut values);

        self.db
            .connection()
            .execute(&sql, params_from_iter(bound))
            .map_err(|error| self.db.map_error(&error))
    }
}

impl RecordStore for TableRecordStore {
    fn list<R: StoredRecord>(&self, user_id: UserId) -> ClientResult<Vec<R>> {
        let sql = Self::select_sql::<R>();
        let mut statement = self
            .db
            .connection()
            .prepare(&sql)
            .map_err(|error| self.db.map_error(&error))?;
        let mut rows = statement
            .query([user_id])
            .map_err(|error| self.db.map_error(&error))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(|error| self.db.map_error(&error))? {
            match R::from_row(row) {
                Ok(record) if record.is_well_formed() => records.push(record),
                Ok(record) => {
                    tracing::warn!(
                        table = %R::COLLECTION,
                        id = record.id(),
                        "dropping out-of-range row"
                    );
                }
                Err(
                    error @ (rusqlite::Error::FromSqlConversionFailure(..)
                    | rusqlite::Error::InvalidColumnType(..)),
                ) => {
                    tracing::warn!(
                        table = %R::COLLECTION,
                        error = %error,
                        "dropping malformed row"
                    );
                }
                Err(error) => return Err(self.db.map_error(&error)),
            }
        }
        Ok(records)
    }

    fn apply<R: StoredRecord>(
        &self,
        user_id: UserId,
        current: &[R],
        change: &Change<R>,
    ) -> ClientResult<Vec<R>> {
        let affected = match self.execute(user_id, change) {
            Ok(affected) => affected,
            Err(error) => {
                tracing::warn!(
                    table = %R::COLLECTION,
                    user_id,
                    code = %error.code,
                    "row write failed"
                );
                return Err(error);
            }
        };

        if affected == 0 {
            tracing::debug!(
                table = %R::COLLECTION,
                user_id,
                id = change.target_id(),
                "change matched no row"
            );
            return Ok(current.to_vec());
        }

        self.feed.publish(ChangeEvent {
            collection: R::COLLECTION,
            user_id,
        });
        self.list(user_id)
    }

    fn ensure_collection(&self, _user_id: UserId, _collection: Collection) -> ClientResult<()> {
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::NaiveDate;
    use rusqlite::params;
    use rust_decimal_macros::dec;
    use tokio::sync::broadcast::error::TryRecvError;

    use super::TableRecordStore;
    use crate::config::{Backend, Config};
    use crate::models::{Budget, BudgetPeriod, Goal};
    use crate::setup::ensure_initialized;
    use crate::store::database::Database;
    use crate::store::feed::ChangeFeed;
    use crate::store::records::Change;
    use crate::store::RecordStore;

    fn open_store(home: &std::path::Path) -> Option<(Rc<Database>, TableRecordStore)> {
        let config = Config::default()
            .with_home(Some(home.to_path_buf()))
            .with_backend(Some(Backend::Tables));
        let setup = ensure_initialized(&config).ok()?;
        let db = Rc::new(Database::open(&setup).ok()?);
        db.connection()
            .execute(
                "INSERT INTO users (id, name, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![1_i64, "Ana", "ana@example.com", "hash", "2026-10-16T00:00:00.000Z"],
            )
            .ok()?;
        let store = TableRecordStore::new(Rc::clone(&db), ChangeFeed::default());
        Some((db, store))
    }

    fn goal(id: i64) -> Goal {
        Goal {
            id,
            title: "Emergency".to_string(),
            target_amount: dec!(5000),
            current_amount: dec!(250.50),
            deadline: NaiveDate::from_ymd_opt(2027, 3, 1).unwrap_or_default(),
            category: "Emergency Fund".to_string(),
            color_tag: "#6366f1".to_string(),
            completed: false,
        }
    }

    #[test]
    fn insert_update_delete_reload_from_the_table() {
        let temp = tempfile::tempdir();
        assert!(temp.is_ok());
        let opened = temp.as_ref().ok().and_then(|t| open_store(t.path()));
        assert!(opened.is_some());
        let Some((_db, store)) = opened else {
            return;
        };
        let mut events = store.subscribe();

        let inserted = store.apply(1, &[], &Change::Insert(goal(100)));
        assert!(inserted.is_ok());
        let current = inserted.unwrap_or_default();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].current_amount, dec!(250.50));
        assert!(events.try_recv().is_ok());

        let mut edited = goal(100);
        assert!(edited.contribute(dec!(4749.50)));
        let updated = store.apply(1, &current, &Change::Update(edited));
        assert!(updated.is_ok());
        let current = updated.unwrap_or_default();
        assert!(current[0].completed);

        let missing = store.apply(1, &current, &Change::<Goal>::Delete(5));
        assert_eq!(missing.ok().map(|records| records.len()), Some(1));
        assert!(events.try_recv().is_ok());
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        let deleted = store.apply(1, &current, &Change::<Goal>::Delete(100));
        assert_eq!(deleted.ok().map(|records| records.len()), Some(0));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let temp = tempfile::tempdir();
        assert!(temp.is_ok());
        let opened = temp.as_ref().ok().and_then(|t| open_store(t.path()));
        assert!(opened.is_some());
        let Some((db, store)) = opened else {
            return;
        };
        let insert = db.connection().execute_batch(
            "INSERT INTO budgets (id, user_id, category, limit_amount, spent, period, color)
             VALUES (1, 1, 'Travel', '300', '20', 'monthly', '#6366f1');
             INSERT INTO budgets (id, user_id, category, limit_amount, spent, period, color)
             VALUES (2, 1, 'Fitness', 'lots', '0', 'monthly', '#f87171');",
        );
        assert!(insert.is_ok());

        let budgets = store.list::<Budget>(1);
        assert!(budgets.is_ok());
        if let Ok(budgets) = budgets {
            assert_eq!(budgets.len(), 1);
            assert_eq!(budgets[0].period, BudgetPeriod::Monthly);
            assert_eq!(budgets[0].spent, dec!(20));
        }
    }
}
