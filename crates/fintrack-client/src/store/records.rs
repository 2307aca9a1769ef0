use std::fmt;
use std::str::FromStr;

use rusqlite::Row;
use rusqlite::types::{Type, Value};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::date::{format_iso_date, parse_record_date};
use crate::models::{
    Budget, BudgetPeriod, Goal, RecordId, Transaction, TransactionKind, UserId,
};

/// The three per-user record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Transactions,
    Budgets,
    Goals,
}

impl Collection {
    /// Also the table name in the tables backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Budgets => "budgets",
            Self::Goals => "goals",
        }
    }

    pub fn storage_key(self, user_id: UserId) -> String {
        format!("{}_{user_id}", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record type that can live in either backend.
///
/// `COLUMNS` lists the table columns after `id` and `user_id`, in the order
/// `column_values` produces and `from_row` reads them (starting at index 1).
pub trait StoredRecord: Serialize + DeserializeOwned + Clone + fmt::Debug {
    const COLLECTION: Collection;
    const COLUMNS: &'static [&'static str];
    const ORDER_BY: &'static str;

    fn id(&self) -> RecordId;
    fn is_well_formed(&self) -> bool;
    fn column_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// One mutation of a user's collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<R> {
    Insert(R),
    Update(R),
    Delete(RecordId),
}

impl<R: StoredRecord> Change<R> {
    pub fn target_id(&self) -> RecordId {
        match self {
            Self::Insert(record) | Self::Update(record) => record.id(),
            Self::Delete(id) => *id,
        }
    }

    /// Applies the change in place. Returns `false` when nothing matched.
    pub fn apply_to(&self, records: &mut Vec<R>) -> bool {
        match self {
            Self::Insert(record) => {
                records.push(record.clone());
                true
            }
            Self::Update(record) => {
                match records.iter_mut().find(|existing| existing.id() == record.id()) {
                    Some(slot) => {
                        *slot = record.clone();
                        true
                    }
                    None => false,
                }
            }
            Self::Delete(id) => {
                let before = records.len();
                records.retain(|existing| existing.id() != *id);
                records.len() != before
            }
        }
    }
}

/// New ids are epoch milliseconds, bumped past any id already in use.
pub fn next_record_id<R: StoredRecord>(existing: &[R], now_millis: i64) -> RecordId {
    let highest = existing.iter().map(StoredRecord::id).max();
    match highest {
        Some(highest) if highest >= now_millis => highest.saturating_add(1),
        _ => now_millis,
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[derive(Debug, Error)]
#[error("{0}")]
struct ColumnDecodeError(String);

fn decode_failure(index: usize, message: String) -> rusqlite::Error {
    let source = Box::new(ColumnDecodeError(message));
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, source)
}

fn decimal_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Decimal> {
    let raw = row.get::<_, String>(index)?;
    Decimal::from_str(raw.trim())
        .map_err(|error| decode_failure(index, format!("invalid amount `{raw}`: {error}")))
}

fn date_column(row: &Row<'_>, index: usize) -> rusqlite::Result<chrono::NaiveDate> {
    let raw = row.get::<_, String>(index)?;
    parse_record_date(&raw).ok_or_else(|| decode_failure(index, format!("invalid date `{raw}`")))
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

impl StoredRecord for Transaction {
    const COLLECTION: Collection = Collection::Transactions;
    const COLUMNS: &'static [&'static str] =
        &["description", "amount", "kind", "category", "occurred_on"];
    const ORDER_BY: &'static str = "occurred_on DESC, id DESC";

    fn id(&self) -> RecordId {
        self.id
    }

    fn is_well_formed(&self) -> bool {
        Transaction::is_well_formed(self)
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            text(&self.description),
            text(&self.amount.to_string()),
            text(self.kind.as_str()),
            text(&self.category),
            text(&format_iso_date(&self.occurred_on)),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let kind_raw = row.get::<_, String>(3)?;
        let kind = TransactionKind::parse(&kind_raw)
            .ok_or_else(|| decode_failure(3, format!("invalid kind `{kind_raw}`")))?;
        Ok(Self {
            id: row.get(0)?,
            description: row.get(1)?,
            amount: decimal_column(row, 2)?,
            kind,
            category: row.get(4)?,
            occurred_on: date_column(row, 5)?,
        })
    }
}

impl StoredRecord for Budget {
    const COLLECTION: Collection = Collection::Budgets;
    const COLUMNS: &'static [&'static str] =
        &["category", "limit_amount", "spent", "period", "color"];
    const ORDER_BY: &'static str = "id ASC";

    fn id(&self) -> RecordId {
        self.id
    }

    fn is_well_formed(&self) -> bool {
        Budget::is_well_formed(self)
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            text(&self.category),
            text(&self.limit.to_string()),
            text(&self.spent.to_string()),
            text(self.period.as_str()),
            text(&self.color_tag),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let period_raw = row.get::<_, String>(4)?;
        let period = BudgetPeriod::parse(&period_raw)
            .ok_or_else(|| decode_failure(4, format!("invalid period `{period_raw}`")))?;
        Ok(Self {
            id: row.get(0)?,
            category: row.get(1)?,
            limit: decimal_column(row, 2)?,
            spent: decimal_column(row, 3)?,
            period,
            color_tag: row.get(5)?,
        })
    }
}

impl StoredRecord for Goal {
    const COLLECTION: Collection = Collection::Goals;
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "target_amount",
        "current_amount",
        "deadline",
        "category",
        "color",
        "completed",
    ];
    const ORDER_BY: &'static str = "deadline ASC, id ASC";

    fn id(&self) -> RecordId {
        self.id
    }

    fn is_well_formed(&self) -> bool {
        Goal::is_well_formed(self)
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            text(&self.title),
            text(&self.target_amount.to_string()),
            text(&self.current_amount.to_string()),
            text(&format_iso_date(&self.deadline)),
            text(&self.category),
            text(&self.color_tag),
            Value::Integer(i64::from(self.completed)),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            target_amount: decimal_column(row, 2)?,
            current_amount: decimal_column(row, 3)?,
            deadline: date_column(row, 4)?,
            category: row.get(5)?,
            color_tag: row.get(6)?,
            completed: row.get::<_, i64>(7)? != 0,
        })
    }
}
