use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;

use crate::ClientResult;
use crate::aggregate::{
    DEFAULT_DAILY_WINDOW, DEFAULT_MONTHLY_WINDOW, SeriesPoint, Summary, bucket_daily,
    bucket_monthly, summarize,
};
use crate::models::{Session, Transaction};
use crate::store::feed::ChangeEvent;
use crate::store::records::Collection;
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub summary: Summary,
    pub daily: Vec<SeriesPoint>,
    pub monthly: Vec<SeriesPoint>,
}

/// Read-only view over the session's transactions.
pub struct Dashboard<'a, S> {
    store: &'a S,
    session: Session,
    transactions: Vec<Transaction>,
    changes: Receiver<ChangeEvent>,
}

impl<'a, S: RecordStore> Dashboard<'a, S> {
    pub fn load(store: &'a S, session: &Session) -> ClientResult<Self> {
        // Subscribe before reading so no write slips between the two.
        let changes = store.subscribe();
        let transactions = store.list(session.user_id)?;
        Ok(Self {
            store,
            session: session.clone(),
            transactions,
            changes,
        })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn snapshot(&self, today: NaiveDate) -> DashboardSnapshot {
        DashboardSnapshot {
            summary: summarize(&self.transactions),
            daily: bucket_daily(&self.transactions, today, DEFAULT_DAILY_WINDOW),
            monthly: bucket_monthly(&self.transactions, today, DEFAULT_MONTHLY_WINDOW),
        }
    }

    /// Reloads when the feed reported a write to this user's transactions.
    pub fn refresh_if_changed(&mut self) -> ClientResult<bool> {
        let mut dirty = false;
        loop {
            match self.changes.try_recv() {
                Ok(event) => {
                    dirty |= event.collection == Collection::Transactions
                        && event.user_id == self.session.user_id;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "change feed lagged; reloading");
                    dirty = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        if dirty {
            self.transactions = self.store.list(self.session.user_id)?;
        }
        Ok(dirty)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::Dashboard;
    use crate::models::{Budget, BudgetPeriod, Session, Transaction, TransactionKind};
    use crate::store::feed::ChangeFeed;
    use crate::store::kv::MemoryKeyValueStore;
    use crate::store::local::LocalRecordStore;
    use crate::store::records::Change;
    use crate::store::RecordStore;

    fn session(user_id: i64) -> Session {
        Session {
            user_id,
            display_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap_or_default()
    }

    fn tx(id: i64, kind: TransactionKind, amount: rust_decimal::Decimal) -> Transaction {
        Transaction {
            id,
            description: "x".to_string(),
            amount,
            kind,
            category: "Other".to_string(),
            occurred_on: today(),
        }
    }

    #[test]
    fn snapshot_combines_summary_and_series() {
        let kv = Rc::new(MemoryKeyValueStore::new());
        let store = LocalRecordStore::new(kv, ChangeFeed::default());
        let seeded = store
            .apply(1, &[], &Change::Insert(tx(1, TransactionKind::Income, dec!(100))))
            .and_then(|current| {
                store.apply(1, &current, &Change::Insert(tx(2, TransactionKind::Expense, dec!(40))))
            });
        assert!(seeded.is_ok());

        let Ok(dashboard) = Dashboard::load(&store, &session(1)) else {
            return;
        };
        let snapshot = dashboard.snapshot(today());
        assert_eq!(snapshot.summary.net, dec!(60));
        assert_eq!(snapshot.daily.len(), 7);
        assert_eq!(snapshot.daily[6].income, dec!(100));
        assert_eq!(snapshot.monthly.len(), 3);
        assert_eq!(snapshot.monthly[2].expense, dec!(40));
    }

    #[test]
    fn refresh_only_reacts_to_own_transactions() {
        let kv = Rc::new(MemoryKeyValueStore::new());
        let store = LocalRecordStore::new(kv, ChangeFeed::default());
        let Ok(mut dashboard) = Dashboard::load(&store, &session(1)) else {
            return;
        };
        assert_eq!(dashboard.refresh_if_changed().ok(), Some(false));

        let budget = Budget {
            id: 1,
            category: "Travel".to_string(),
            limit: dec!(10),
            spent: dec!(0),
            period: BudgetPeriod::Weekly,
            color_tag: "#6366f1".to_string(),
        };
        assert!(store.apply(1, &[], &Change::Insert(budget)).is_ok());
        let other_user = Change::Insert(tx(9, TransactionKind::Income, dec!(5)));
        assert!(store.apply(2, &[], &other_user).is_ok());
        assert_eq!(dashboard.refresh_if_changed().ok(), Some(false));

        let own = Change::Insert(tx(3, TransactionKind::Income, dec!(7)));
        assert!(store.apply(1, &[], &own).is_ok());
        assert_eq!(dashboard.refresh_if_changed().ok(), Some(true));
        assert_eq!(dashboard.transactions().len(), 1);
        assert_eq!(dashboard.refresh_if_changed().ok(), Some(false));
    }
}
