use crate::auth::accounts::{PasswordChange, ProfileUpdate};
use crate::commands::context::{CommandOptions, Workspace};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{AccountDeletedData, AuthData, PasswordChangedData, ProfileData};
use crate::session::Route;
use crate::views::ProfileView;
use crate::ClientResult;

pub fn show(options: CommandOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Profile)?;
    let view = ProfileView::new(&workspace.auth, &session);
    success(
        "profile show",
        ProfileData {
            profile: view.details()?,
            backend: workspace.backend(),
        },
    )
}

pub fn update(options: CommandOptions<'_>, form: &ProfileUpdate) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Profile)?;
    let mut view = ProfileView::new(&workspace.auth, &session);
    let session = view.update(form)?.into_result("profile update")?;
    success(
        "profile update",
        AuthData {
            message: "Profile updated.".to_string(),
            session,
            backend: workspace.backend(),
        },
    )
}

pub fn change_password(
    options: CommandOptions<'_>,
    form: &PasswordChange,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Profile)?;
    let view = ProfileView::new(&workspace.auth, &session);
    view.change_password(form)?.into_result("profile password")?;
    success(
        "profile password",
        PasswordChangedData {
            changed: true,
            message: "Password changed.".to_string(),
        },
    )
}

pub fn delete(options: CommandOptions<'_>, confirm: bool) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Profile)?;
    let mut view = ProfileView::new(&workspace.auth, &session);
    view.request_delete_account();
    if !confirm {
        let pending_confirmation = view.delete_pending();
        view.cancel_delete_account();
        return success(
            "profile delete",
            AccountDeletedData {
                deleted: false,
                pending_confirmation,
                message: "Re-run with `--confirm` to delete this account.".to_string(),
            },
        );
    }

    let deleted = view.confirm_delete_account()?;
    success(
        "profile delete",
        AccountDeletedData {
            deleted,
            pending_confirmation: false,
            message: "Account deleted and signed out. Saved records were kept.".to_string(),
        },
    )
}
