use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::RecordId;
use crate::models::date::lenient_date;

pub const INCOME_CATEGORIES: [&str; 5] =
    ["Salary", "Freelance", "Investment", "Gift", "Other Income"];

pub const EXPENSE_CATEGORIES: [&str; 7] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Bills",
    "Shopping",
    "Healthcare",
    "Other Expense",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn categories(self) -> &'static [&'static str] {
        match self {
            Self::Income => &INCOME_CATEGORIES,
            Self::Expense => &EXPENSE_CATEGORIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    #[serde(rename = "date", with = "lenient_date")]
    pub occurred_on: NaiveDate,
}

impl Transaction {
    pub fn is_well_formed(&self) -> bool {
        !self.amount.is_sign_negative()
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}
