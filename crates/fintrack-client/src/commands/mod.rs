pub mod auth;
pub mod budgets;
pub mod context;
pub mod dashboard;
pub mod goals;
pub mod navigation;
pub mod profile;
pub mod transactions;

pub use context::{CommandOptions, Workspace};

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::DeleteData;
use crate::models::RecordId;

fn delete_envelope(
    command: &str,
    collection: &'static str,
    id: RecordId,
    confirm: bool,
    deleted: bool,
) -> ClientResult<SuccessEnvelope> {
    let message = if deleted {
        format!("Deleted {collection} record `{id}`.")
    } else if confirm {
        format!("Nothing was deleted; {collection} record `{id}` is already gone.")
    } else {
        format!("Re-run with `--confirm` to delete {collection} record `{id}`.")
    };
    success(
        command,
        DeleteData {
            collection,
            id,
            deleted,
            pending_confirmation: !confirm,
            message,
        },
    )
}
