use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{SeriesPoint, Summary};
use crate::config::Backend;
use crate::models::{Budget, BudgetStatus, Goal, GoalStatus, RecordId, Session, Transaction};
use crate::session::Route;
use crate::views::{BudgetTotals, GoalTotals, KindFilter, ProfileDetails, Totals};

#[derive(Debug, Clone, Serialize)]
pub struct AuthData {
    pub session: Session,
    pub backend: Backend,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthStatusData {
    pub authenticated: bool,
    pub session: Option<Session>,
    pub backend: Backend,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutData {
    pub signed_out: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub session: Session,
    pub today: NaiveDate,
    pub summary: Summary,
    pub daily: Vec<SeriesPoint>,
    pub monthly: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryOptions {
    pub income: Vec<&'static str>,
    pub expense: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionListData {
    pub filter: KindFilter,
    pub search: Option<String>,
    pub transactions: Vec<Transaction>,
    pub totals: Totals,
    pub categories: CategoryOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionSavedData {
    pub transaction: Transaction,
}

/// Outcome of a two-phase delete request.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteData {
    pub collection: &'static str,
    pub id: RecordId,
    pub deleted: bool,
    pub pending_confirmation: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetRow {
    #[serde(flatten)]
    pub budget: Budget,
    pub percentage: Decimal,
    pub status: BudgetStatus,
    pub remaining: Decimal,
}

impl From<&Budget> for BudgetRow {
    fn from(budget: &Budget) -> Self {
        Self {
            budget: budget.clone(),
            percentage: budget.percentage(),
            status: budget.status(),
            remaining: budget.remaining(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetListData {
    pub budgets: Vec<BudgetRow>,
    pub totals: BudgetTotals,
    pub available_categories: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetSavedData {
    pub budget: BudgetRow,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalRow {
    #[serde(flatten)]
    pub goal: Goal,
    pub percentage: Decimal,
    pub remaining: Decimal,
    pub days_remaining: i64,
    pub status: GoalStatus,
}

impl GoalRow {
    pub fn new(goal: &Goal, today: NaiveDate) -> Self {
        Self {
            goal: goal.clone(),
            percentage: goal.percentage(),
            remaining: goal.remaining(),
            days_remaining: goal.days_remaining(today),
            status: goal.status(today),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalListData {
    pub today: NaiveDate,
    pub active: Vec<GoalRow>,
    pub completed: Vec<GoalRow>,
    pub totals: GoalTotals,
    pub categories: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalSavedData {
    pub goal: GoalRow,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileData {
    pub profile: ProfileDetails,
    pub backend: Backend,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChangedData {
    pub changed: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountDeletedData {
    pub deleted: bool,
    pub pending_confirmation: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationData {
    pub requested: String,
    pub route: Route,
    pub allowed: bool,
    pub destination: Route,
    pub path: &'static str,
    pub session: Option<Session>,
}
