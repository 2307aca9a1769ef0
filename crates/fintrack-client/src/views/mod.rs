pub mod budgets;
pub mod dashboard;
pub mod form;
pub mod goals;
pub mod list;
pub mod profile;
pub mod transactions;

pub use budgets::{BudgetDraft, BudgetTotals, BudgetsView};
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use form::{FieldIssue, FormOutcome};
pub use goals::{GoalDraft, GoalTotals, GoalsView};
pub use profile::{ProfileDetails, ProfileView};
pub use transactions::{KindFilter, Totals, TransactionDraft, TransactionsView};
