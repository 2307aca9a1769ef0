use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::commands::context::{CommandOptions, Workspace};
use crate::commands::delete_envelope;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{GoalListData, GoalRow, GoalSavedData};
use crate::models::RecordId;
use crate::models::goal::GOAL_CATEGORIES;
use crate::session::Route;
use crate::views::{GoalDraft, GoalsView};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub struct GoalEdit {
    pub title: Option<String>,
    pub target_amount: Option<Decimal>,
    pub current_amount: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
}

pub fn list(options: CommandOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Goals)?;
    let view = GoalsView::load(&workspace.store, &session)?;
    let today = options.today();
    success(
        "goals list",
        GoalListData {
            today,
            active: view.active().into_iter().map(|goal| GoalRow::new(goal, today)).collect(),
            completed: view
                .completed()
                .into_iter()
                .map(|goal| GoalRow::new(goal, today))
                .collect(),
            totals: view.totals(),
            categories: GOAL_CATEGORIES.to_vec(),
        },
    )
}

pub fn add(options: CommandOptions<'_>, draft: &GoalDraft) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Goals)?;
    let mut view = GoalsView::load(&workspace.store, &session)?;
    let goal = view.create(draft)?.into_result("goals add")?;
    success(
        "goals add",
        GoalSavedData {
            goal: GoalRow::new(&goal, options.today()),
        },
    )
}

pub fn edit(
    options: CommandOptions<'_>,
    id: RecordId,
    edit: &GoalEdit,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Goals)?;
    let mut view = GoalsView::load(&workspace.store, &session)?;
    let Some(existing) = view.records().iter().find(|record| record.id == id).cloned() else {
        return Err(ClientError::record_not_found("goals", id));
    };

    let draft = GoalDraft {
        title: edit.title.clone().unwrap_or(existing.title),
        target_amount: edit.target_amount.or(Some(existing.target_amount)),
        current_amount: edit.current_amount.or(Some(existing.current_amount)),
        deadline: edit.deadline.or(Some(existing.deadline)),
        category: edit.category.clone().unwrap_or(existing.category),
    };
    let goal = view.update(id, &draft)?.into_result("goals edit")?;
    success(
        "goals edit",
        GoalSavedData {
            goal: GoalRow::new(&goal, options.today()),
        },
    )
}

pub fn contribute(
    options: CommandOptions<'_>,
    id: RecordId,
    amount: Option<Decimal>,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Goals)?;
    let mut view = GoalsView::load(&workspace.store, &session)?;
    let goal = view.contribute(id, amount)?.into_result("goals contribute")?;
    success(
        "goals contribute",
        GoalSavedData {
            goal: GoalRow::new(&goal, options.today()),
        },
    )
}

pub fn delete(
    options: CommandOptions<'_>,
    id: RecordId,
    confirm: bool,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Goals)?;
    let mut view = GoalsView::load(&workspace.store, &session)?;
    if !view.records().iter().any(|record| record.id == id) {
        return Err(ClientError::record_not_found("goals", id));
    }
    view.request_delete(id);
    let deleted = if confirm {
        view.confirm_delete()?
    } else {
        view.cancel_delete();
        false
    };
    delete_envelope("goals delete", "goals", id, confirm, deleted)
}
