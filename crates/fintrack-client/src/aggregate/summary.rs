use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TransactionKind};

pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net: Decimal,
    pub count: usize,
    pub recent: Vec<Transaction>,
}

/// Totals by kind. Sums pin at `Decimal::MAX` rather than overflow.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => {
                total_income = total_income.saturating_add(transaction.amount);
            }
            TransactionKind::Expense => {
                total_expenses = total_expenses.saturating_add(transaction.amount);
            }
        }
    }

    Summary {
        total_income,
        total_expenses,
        net: total_income.saturating_sub(total_expenses),
        count: transactions.len(),
        recent: newest_first(transactions, RECENT_LIMIT),
    }
}

/// Newest `limit` transactions; ties keep their stored order.
pub fn newest_first(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|left, right| right.occurred_on.cmp(&left.occurred_on));
    sorted.truncate(limit);
    sorted
}
