use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Transaction;
use crate::models::date::{month_offset, month_start_before};

pub const DEFAULT_DAILY_WINDOW: usize = 7;
pub const DEFAULT_MONTHLY_WINDOW: usize = 3;

/// One chart bucket, oldest first within a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

impl SeriesPoint {
    fn empty(label: String) -> Self {
        Self {
            label,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        }
    }

    fn add(&mut self, transaction: &Transaction) {
        if transaction.is_income() {
            self.income = self.income.saturating_add(transaction.amount);
        } else {
            self.expense = self.expense.saturating_add(transaction.amount);
        }
    }
}

/// Buckets the last `window_days` days ending at `today`.
pub fn bucket_daily(
    transactions: &[Transaction],
    today: NaiveDate,
    window_days: usize,
) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = (0..window_days)
        .rev()
        .map(|offset| {
            let day = i64::try_from(offset)
                .ok()
                .and_then(|offset| today.checked_sub_signed(chrono::Duration::days(offset)));
            SeriesPoint::empty(day.map(|day| day.format("%b %-d").to_string()).unwrap_or_default())
        })
        .collect();

    for transaction in transactions {
        let offset = (today - transaction.occurred_on).num_days();
        if let Some(index) = bucket_index(offset, window_days) {
            points[index].add(transaction);
        }
    }
    points
}

/// Buckets the last `window_months` calendar months, the current one included.
pub fn bucket_monthly(
    transactions: &[Transaction],
    today: NaiveDate,
    window_months: usize,
) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = (0..window_months)
        .rev()
        .map(|offset| {
            let month = u32::try_from(offset)
                .ok()
                .and_then(|offset| month_start_before(today, offset));
            let label = month
                .map(|month| month.format("%b").to_string())
                .unwrap_or_default();
            SeriesPoint::empty(label)
        })
        .collect();

    for transaction in transactions {
        let offset = month_offset(today, transaction.occurred_on);
        if let Some(index) = bucket_index(offset, window_months) {
            points[index].add(transaction);
        }
    }
    points
}

/// Maps an offset in `[0, window)` to its slot, oldest first.
fn bucket_index(offset: i64, window: usize) -> Option<usize> {
    let offset = usize::try_from(offset).ok()?;
    if offset >= window {
        return None;
    }
    Some(window - 1 - offset)
}
