use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::RecordId;

pub const BUDGET_CATEGORIES: [&str; 10] = [
    "Food & Dining",
    "Transportation",
    "Entertainment",
    "Shopping",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "Travel",
    "Fitness",
    "Personal Care",
];

pub const BUDGET_COLORS: [&str; 8] = [
    "#6366f1", "#f87171", "#22c55e", "#f59e0b", "#a78bfa", "#f472b6", "#60a5fa", "#fb923c",
];

const WARNING_PERCENTAGE: i64 = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Weekly,
}

impl BudgetPeriod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(Self::Monthly),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    Good,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::OverBudget => "over-budget",
        }
    }
}

/// Spending cap for one category. `spent` is maintained outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: RecordId,
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub period: BudgetPeriod,
    #[serde(rename = "color")]
    pub color_tag: String,
}

impl Budget {
    pub fn is_well_formed(&self) -> bool {
        !self.category.trim().is_empty()
            && self.limit > Decimal::ZERO
            && !self.spent.is_sign_negative()
    }

    /// Share of the limit already spent, capped at 100.
    pub fn percentage(&self) -> Decimal {
        capped_percentage(self.spent, self.limit)
    }

    pub fn status(&self) -> BudgetStatus {
        let percentage = self.percentage();
        if percentage >= Decimal::ONE_HUNDRED {
            BudgetStatus::OverBudget
        } else if percentage >= Decimal::from(WARNING_PERCENTAGE) {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Good
        }
    }

    pub fn remaining(&self) -> Decimal {
        (self.limit - self.spent).max(Decimal::ZERO)
    }
}

pub(crate) fn capped_percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|value| value.min(Decimal::ONE_HUNDRED).round_dp(2))
        .unwrap_or(Decimal::ZERO)
}
