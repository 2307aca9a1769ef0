use crate::ClientResult;
use crate::auth::accounts::{self, SignUp};
use crate::auth::AuthBackend;
use crate::commands::context::{CommandOptions, Workspace};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{AuthData, AuthStatusData, LogoutData};
use crate::session::{SessionGuard, SessionState};
use crate::store::{Collection, RecordStore};

pub fn signup(options: CommandOptions<'_>, form: &SignUp) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = accounts::sign_up(&workspace.auth, form)?.into_result("auth signup")?;
    workspace
        .store
        .ensure_collection(session.user_id, Collection::Transactions)?;

    let message = format!("Welcome, {}. You are signed in.", session.display_name);
    success(
        "auth signup",
        AuthData {
            session,
            backend: workspace.backend(),
            message,
        },
    )
}

pub fn login(
    options: CommandOptions<'_>,
    email: &str,
    password: &str,
) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = accounts::sign_in(&workspace.auth, email, password)?.into_result("auth login")?;
    let message = format!("Signed in as {}.", session.email);
    success(
        "auth login",
        AuthData {
            session,
            backend: workspace.backend(),
            message,
        },
    )
}

pub fn logout(options: CommandOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let signed_out = workspace.auth.has_stored_session()?;
    accounts::sign_out(&workspace.auth)?;
    let message = if signed_out {
        "Signed out.".to_string()
    } else {
        "No one was signed in.".to_string()
    };
    success("auth logout", LogoutData { signed_out, message })
}

pub fn status(options: CommandOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = match SessionGuard::new(&workspace.auth).state() {
        SessionState::Authenticated(session) => Some(session),
        SessionState::Unauthenticated => None,
    };
    success(
        "auth status",
        AuthStatusData {
            authenticated: session.is_some(),
            session,
            backend: workspace.backend(),
        },
    )
}
