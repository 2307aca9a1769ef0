use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::commands::context::{CommandOptions, Workspace};
use crate::commands::delete_envelope;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CategoryOptions, TransactionListData, TransactionSavedData};
use crate::models::transaction::{EXPENSE_CATEGORIES, INCOME_CATEGORIES};
use crate::models::{RecordId, TransactionKind};
use crate::session::Route;
use crate::views::{KindFilter, TransactionDraft, TransactionsView};
use crate::{ClientError, ClientResult};

/// Fields to change on an existing transaction; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TransactionEdit {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

pub fn list(
    options: CommandOptions<'_>,
    filter: KindFilter,
    search: Option<&str>,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Transactions)?;
    let mut view = TransactionsView::load(&workspace.store, &session)?;
    view.set_filter(filter);
    if let Some(search) = search {
        view.set_search(search);
    }

    success(
        "transactions list",
        TransactionListData {
            filter,
            search: search.map(str::to_string),
            transactions: view.visible(),
            totals: view.totals(),
            categories: CategoryOptions {
                income: INCOME_CATEGORIES.to_vec(),
                expense: EXPENSE_CATEGORIES.to_vec(),
            },
        },
    )
}

pub fn add(options: CommandOptions<'_>, draft: &TransactionDraft) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Transactions)?;
    let mut view = TransactionsView::load(&workspace.store, &session)?;
    let transaction = view
        .create(draft, options.today())?
        .into_result("transactions add")?;
    success("transactions add", TransactionSavedData { transaction })
}

pub fn edit(
    options: CommandOptions<'_>,
    id: RecordId,
    edit: &TransactionEdit,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Transactions)?;
    let mut view = TransactionsView::load(&workspace.store, &session)?;
    let Some(existing) = view.records().iter().find(|record| record.id == id).cloned() else {
        return Err(ClientError::record_not_found("transactions", id));
    };

    let draft = TransactionDraft {
        description: edit.description.clone().unwrap_or(existing.description),
        amount: edit.amount.or(Some(existing.amount)),
        kind: edit.kind.unwrap_or(existing.kind),
        category: edit.category.clone().unwrap_or(existing.category),
        occurred_on: edit.occurred_on.or(Some(existing.occurred_on)),
    };
    let transaction = view
        .update(id, &draft, options.today())?
        .into_result("transactions edit")?;
    success("transactions edit", TransactionSavedData { transaction })
}

pub fn delete(
    options: CommandOptions<'_>,
    id: RecordId,
    confirm: bool,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Transactions)?;
    let mut view = TransactionsView::load(&workspace.store, &session)?;
    if !view.records().iter().any(|record| record.id == id) {
        return Err(ClientError::record_not_found("transactions", id));
    }
    view.request_delete(id);
    let deleted = if confirm {
        view.confirm_delete()?
    } else {
        view.cancel_delete();
        false
    };
    delete_envelope("transactions delete", "transactions", id, confirm, deleted)
}
