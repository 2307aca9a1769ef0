use rust_decimal::Decimal;

use crate::commands::context::{CommandOptions, Workspace};
use crate::commands::delete_envelope;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{BudgetListData, BudgetRow, BudgetSavedData};
use crate::models::{BudgetPeriod, RecordId};
use crate::session::Route;
use crate::views::{BudgetDraft, BudgetsView};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub struct BudgetEdit {
    pub category: Option<String>,
    pub limit: Option<Decimal>,
    pub period: Option<BudgetPeriod>,
}

pub fn list(options: CommandOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Budgets)?;
    let view = BudgetsView::load(&workspace.store, &session)?;
    success(
        "budgets list",
        BudgetListData {
            budgets: view.records().iter().map(BudgetRow::from).collect(),
            totals: view.totals(),
            available_categories: view.available_categories(false),
        },
    )
}

pub fn add(options: CommandOptions<'_>, draft: &BudgetDraft) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Budgets)?;
    let mut view = BudgetsView::load(&workspace.store, &session)?;
    let budget = view.create(draft)?.into_result("budgets add")?;
    success(
        "budgets add",
        BudgetSavedData {
            budget: BudgetRow::from(&budget),
        },
    )
}

pub fn edit(
    options: CommandOptions<'_>,
    id: RecordId,
    edit: &BudgetEdit,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Budgets)?;
    let mut view = BudgetsView::load(&workspace.store, &session)?;
    let Some(existing) = view.records().iter().find(|record| record.id == id).cloned() else {
        return Err(ClientError::record_not_found("budgets", id));
    };

    let draft = BudgetDraft {
        category: edit.category.clone().unwrap_or(existing.category),
        limit: edit.limit.or(Some(existing.limit)),
        period: edit.period.unwrap_or(existing.period),
    };
    let budget = view.update(id, &draft)?.into_result("budgets edit")?;
    success(
        "budgets edit",
        BudgetSavedData {
            budget: BudgetRow::from(&budget),
        },
    )
}

pub fn set_spent(
    options: CommandOptions<'_>,
    id: RecordId,
    spent: Option<Decimal>,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Budgets)?;
    let mut view = BudgetsView::load(&workspace.store, &session)?;
    let budget = view.set_spent(id, spent)?.into_result("budgets spent")?;
    success(
        "budgets spent",
        BudgetSavedData {
            budget: BudgetRow::from(&budget),
        },
    )
}

pub fn delete(
    options: CommandOptions<'_>,
    id: RecordId,
    confirm: bool,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Budgets)?;
    let mut view = BudgetsView::load(&workspace.store, &session)?;
    if !view.records().iter().any(|record| record.id == id) {
        return Err(ClientError::record_not_found("budgets", id));
    }
    view.request_delete(id);
    let deleted = if confirm {
        view.confirm_delete()?
    } else {
        view.cancel_delete();
        false
    };
    delete_envelope("budgets delete", "budgets", id, confirm, deleted)
}
