use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::summary::newest_first;
use crate::models::{RecordId, Session, Transaction, TransactionKind, saturating_total};
use crate::store::records::Change;
use crate::store::RecordStore;
use crate::views::form::{FormOutcome, Validator};
use crate::views::list::RecordList;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    fn matches(self, kind: TransactionKind) -> bool {
        match self {
            Self::All => true,
            Self::Income => kind == TransactionKind::Income,
            Self::Expense => kind == TransactionKind::Expense,
        }
    }
}

/// Form input for creating or editing a transaction.
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Option<Decimal>,
    pub kind: TransactionKind,
    pub category: String,
    /// Defaults to today when absent.
    pub occurred_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

pub struct TransactionsView<'a, S> {
    list: RecordList<'a, S, Transaction>,
    filter: KindFilter,
    search: String,
}

impl<'a, S: RecordStore> TransactionsView<'a, S> {
    pub fn load(store: &'a S, session: &Session) -> ClientResult<Self> {
        Ok(Self {
            list: RecordList::load(store, session)?,
            filter: KindFilter::All,
            search: String::new(),
        })
    }

    pub fn records(&self) -> &[Transaction] {
        self.list.records()
    }

    pub fn set_filter(&mut self, filter: KindFilter) {
        self.filter = filter;
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_lowercase();
    }

    /// Filtered by kind and search text, newest first.
    pub fn visible(&self) -> Vec<Transaction> {
        let matching: Vec<Transaction> = self
            .list
            .records()
            .iter()
            .filter(|transaction| self.filter.matches(transaction.kind))
            .filter(|transaction| {
                self.search.is_empty()
                    || transaction.description.to_lowercase().contains(&self.search)
                    || transaction.category.to_lowercase().contains(&self.search)
            })
            .cloned()
            .collect();
        newest_first(&matching, matching.len())
    }

    /// Totals over every transaction, regardless of the active filter.
    pub fn totals(&self) -> Totals {
        let amounts_of = |kind: TransactionKind| {
            saturating_total(
                self.list
                    .records()
                    .iter()
                    .filter(move |transaction| transaction.kind == kind)
                    .map(|transaction| transaction.amount),
            )
        };
        let income = amounts_of(TransactionKind::Income);
        let expenses = amounts_of(TransactionKind::Expense);
        Totals {
            income,
            expenses,
            net: income.saturating_sub(expenses),
        }
    }

    pub fn create(
        &mut self,
        draft: &TransactionDraft,
        today: NaiveDate,
    ) -> ClientResult<FormOutcome<Transaction>> {
        let id = self.list.next_id();
        self.save(id, draft, today, false)
    }

    pub fn update(
        &mut self,
        id: RecordId,
        draft: &TransactionDraft,
        today: NaiveDate,
    ) -> ClientResult<FormOutcome<Transaction>> {
        if self.list.find(id).is_none() {
            return Err(ClientError::record_not_found("transactions", id));
        }
        self.save(id, draft, today, true)
    }

    fn save(
        &mut self,
        id: RecordId,
        draft: &TransactionDraft,
        today: NaiveDate,
        existing: bool,
    ) -> ClientResult<FormOutcome<Transaction>> {
        let mut validator = Validator::new();
        validator
            .require("description", &draft.description, "Description is required.")
            .require_amount("amount", draft.amount, "Amount")
            .require("category", &draft.category, "Category is required.");
        let Some(amount) = draft.amount.filter(|_| validator.is_valid()) else {
            return Ok(FormOutcome::Invalid(validator.into_issues()));
        };

        let transaction = Transaction {
            id,
            description: draft.description.trim().to_string(),
            amount,
            kind: draft.kind,
            category: draft.category.trim().to_string(),
            occurred_on: draft.occurred_on.unwrap_or(today),
        };
        let change = if existing {
            Change::Update(transaction.clone())
        } else {
            Change::Insert(transaction.clone())
        };
        self.list.commit(change)?;
        Ok(FormOutcome::Saved(transaction))
    }

    pub fn request_delete(&mut self, id: RecordId) {
        self.list.request_delete(id);
    }

    pub fn pending_delete(&self) -> Option<RecordId> {
        self.list.pending_delete()
    }

    pub fn cancel_delete(&mut self) {
        self.list.cancel_delete();
    }

    pub fn confirm_delete(&mut self) -> ClientResult<bool> {
        self.list.confirm_delete()
    }

}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::{KindFilter, TransactionDraft, TransactionsView};
    use crate::models::{Session, TransactionKind};
    use crate::store::feed::ChangeFeed;
    use crate::store::kv::MemoryKeyValueStore;
    use crate::store::local::LocalRecordStore;
    use crate::views::form::FormOutcome;

    fn session() -> Session {
        Session {
            user_id: 11,
            display_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap_or_default()
    }

    fn draft(
        description: &str,
        amount: &str,
        kind: TransactionKind,
        category: &str,
    ) -> TransactionDraft {
        TransactionDraft {
            description: description.to_string(),
            amount: amount.parse().ok(),
            kind,
            category: category.to_string(),
            occurred_on: None,
        }
    }

    #[test]
    fn invalid_drafts_never_reach_the_store() {
        let kv = Rc::new(MemoryKeyValueStore::new());
        let store = LocalRecordStore::new(Rc::clone(&kv), ChangeFeed::default());
        let view = TransactionsView::load(&store, &session());
        assert!(view.is_ok());
        let Ok(mut view) = view else {
            return;
        };

        let outcome = view.create(&draft("", "0", TransactionKind::Expense, ""), today());
        assert!(outcome.is_ok());
        if let Ok(outcome) = outcome {
            let fields: Vec<&str> = outcome.issues().iter().map(|i| i.field.as_str()).collect();
            assert_eq!(fields, vec!["description", "amount", "category"]);
        }
        assert!(kv.keys().is_empty());
    }

    #[test]
    fn create_filter_search_and_totals() {
        let store = LocalRecordStore::new(MemoryKeyValueStore::new(), ChangeFeed::default());
        let view = TransactionsView::load(&store, &session());
        let Ok(mut view) = view else {
            return;
        };

        let pay = draft("October pay", "3200", TransactionKind::Income, "Salary");
        let salary = view.create(&pay, today());
        assert!(salary.as_ref().is_ok_and(FormOutcome::is_saved));
        let mut lunch = draft("Lunch", "12.50", TransactionKind::Expense, "Food");
        lunch.occurred_on = NaiveDate::from_ymd_opt(2026, 10, 14);
        assert!(view.create(&lunch, today()).is_ok());

        let totals = view.totals();
        assert_eq!(totals.income, dec!(3200));
        assert_eq!(totals.expenses, dec!(12.50));
        assert_eq!(totals.net, dec!(3187.50));

        let newest: Vec<String> = view.visible().into_iter().map(|t| t.description).collect();
        assert_eq!(newest, vec!["October pay".to_string(), "Lunch".to_string()]);

        view.set_filter(KindFilter::Expense);
        assert_eq!(view.visible().len(), 1);
        view.set_filter(KindFilter::All);
        view.set_search("FOOD");
        assert_eq!(view.visible().len(), 1);
        view.set_search("nothing like this");
        assert!(view.visible().is_empty());
    }

    #[test]
    fn edits_replace_and_deletes_need_confirmation() {
        let store = LocalRecordStore::new(MemoryKeyValueStore::new(), ChangeFeed::default());
        let Ok(mut view) = TransactionsView::load(&store, &session()) else {
            return;
        };
        let ride = draft("Taxi", "20", TransactionKind::Expense, "Transportation");
        let created = view.create(&ride, today());
        let Ok(FormOutcome::Saved(taxi)) = created else {
            return;
        };

        let ride_home = draft("Taxi home", "25", TransactionKind::Expense, "Transportation");
        let edited = view.update(taxi.id, &ride_home, today());
        assert!(edited.is_ok());
        assert_eq!(view.records().len(), 1);
        assert_eq!(view.records()[0].amount, dec!(25));

        let missing = view.update(1, &draft("x", "1", TransactionKind::Expense, "Food"), today());
        assert_eq!(missing.err().map(|e| e.code), Some("record_not_found".to_string()));

        view.request_delete(taxi.id);
        view.cancel_delete();
        assert_eq!(view.confirm_delete().ok(), Some(false));
        assert_eq!(view.records().len(), 1);

        view.request_delete(424242);
        assert_eq!(view.confirm_delete().ok(), Some(false));
        assert_eq!(view.records().len(), 1);

        view.request_delete(taxi.id);
        assert_eq!(view.confirm_delete().ok(), Some(true));
        assert!(view.records().is_empty());
    }
}
