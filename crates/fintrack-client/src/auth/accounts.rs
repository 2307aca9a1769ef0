use crate::auth::password::{MIN_PASSWORD_LENGTH, hash_password, verify_password};
use crate::auth::{AuthBackend, normalize_email};
use crate::models::{Session, User};
use crate::views::form::{FormOutcome, Validator};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

fn check_new_password(validator: &mut Validator, field: &str, password: &str, confirm: &str) {
    validator
        .check(
            password.chars().count() >= MIN_PASSWORD_LENGTH,
            field,
            &format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long."),
        )
        .check(password == confirm, "confirm_password", "Passwords do not match.");
}

/// Registers the user and signs them in.
pub fn sign_up<A: AuthBackend>(auth: &A, form: &SignUp) -> ClientResult<FormOutcome<Session>> {
    let mut validator = Validator::new();
    validator
        .require("name", &form.name, "Name is required.")
        .require("email", &form.email, "Email is required.")
        .require("password", &form.password, "Password is required.")
        .require(
            "confirm_password",
            &form.confirm_password,
            "Please confirm your password.",
        );
    if validator.is_valid() {
        check_new_password(
            &mut validator,
            "password",
            &form.password,
            &form.confirm_password,
        );
    }
    if !validator.is_valid() {
        return Ok(FormOutcome::Invalid(validator.into_issues()));
    }

    let password_hash = hash_password(&form.password)?;
    let user = auth.register(&form.name, &form.email, &password_hash)?;
    let session = auth.start_session(&user)?;
    tracing::info!(user_id = user.id, "account created");
    Ok(FormOutcome::Saved(session))
}

pub fn sign_in<A: AuthBackend>(
    auth: &A,
    email: &str,
    password: &str,
) -> ClientResult<FormOutcome<Session>> {
    let mut validator = Validator::new();
    validator
        .require("email", email, "Email is required.")
        .require("password", password, "Password is required.");
    if !validator.is_valid() {
        return Ok(FormOutcome::Invalid(validator.into_issues()));
    }

    let Some(user) = auth.find_user_by_email(email)? else {
        return Err(ClientError::invalid_credentials());
    };
    if !verify_password(password, &user.password_hash)? {
        return Err(ClientError::invalid_credentials());
    }
    let session = auth.start_session(&user)?;
    tracing::info!(user_id = user.id, "signed in");
    Ok(FormOutcome::Saved(session))
}

pub fn sign_out<A: AuthBackend>(auth: &A) -> ClientResult<()> {
    auth.clear_session()
}

fn load_user<A: AuthBackend>(auth: &A, session: &Session) -> ClientResult<User> {
    auth.find_user(session.user_id)?
        .ok_or_else(|| ClientError::user_not_found(session.user_id))
}

/// Saves name and email, and refreshes the stored session snapshot.
pub fn update_profile<A: AuthBackend>(
    auth: &A,
    session: &Session,
    form: &ProfileUpdate,
) -> ClientResult<FormOutcome<Session>> {
    let mut validator = Validator::new();
    validator
        .require("name", &form.name, "Name is required.")
        .require("email", &form.email, "Email is required.");
    if !validator.is_valid() {
        return Ok(FormOutcome::Invalid(validator.into_issues()));
    }

    let mut user = load_user(auth, session)?;
    let owner = auth.find_user_by_email(&form.email)?;
    if owner.is_some_and(|owner| owner.id != user.id) {
        return Err(ClientError::email_taken(&normalize_email(&form.email)));
    }

    user.name = form.name.trim().to_string();
    user.email = normalize_email(&form.email);
    auth.update_user(&user)?;
    let refreshed = auth.refresh_session(&user)?;
    Ok(FormOutcome::Saved(refreshed))
}

pub fn change_password<A: AuthBackend>(
    auth: &A,
    session: &Session,
    form: &PasswordChange,
) -> ClientResult<FormOutcome<()>> {
    let mut validator = Validator::new();
    validator
        .require(
            "current_password",
            &form.current_password,
            "Current password is required.",
        )
        .require("new_password", &form.new_password, "New password is required.")
        .require(
            "confirm_password",
            &form.confirm_password,
            "Please confirm the new password.",
        );
    if validator.is_valid() {
        check_new_password(
            &mut validator,
            "new_password",
            &form.new_password,
            &form.confirm_password,
        );
    }
    if !validator.is_valid() {
        return Ok(FormOutcome::Invalid(validator.into_issues()));
    }

    let mut user = load_user(auth, session)?;
    if !verify_password(&form.current_password, &user.password_hash)? {
        return Err(ClientError::current_password_incorrect());
    }
    user.password_hash = hash_password(&form.new_password)?;
    auth.update_user(&user)?;
    tracing::info!(user_id = user.id, "password changed");
    Ok(FormOutcome::Saved(()))
}

/// Removes the account and signs out. The user's records stay where they are.
pub fn delete_account<A: AuthBackend>(auth: &A, session: &Session) -> ClientResult<()> {
    auth.delete_user(session.user_id)?;
    auth.clear_session()?;
    tracing::info!(user_id = session.user_id, "account deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        PasswordChange, ProfileUpdate, SignUp, change_password, delete_account, sign_in, sign_up,
        update_profile,
    };
    use crate::auth::{AuthBackend, LocalAuth};
    use crate::models::Session;
    use crate::store::kv::MemoryKeyValueStore;

    fn sign_up_form(email: &str, password: &str, confirm: &str) -> SignUp {
        SignUp {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn registered(auth: &LocalAuth<MemoryKeyValueStore>) -> Option<Session> {
        match sign_up(auth, &sign_up_form("ana@example.com", "secret1", "secret1")) {
            Ok(crate::views::form::FormOutcome::Saved(session)) => Some(session),
            _ => None,
        }
    }

    #[test]
    fn sign_up_reports_field_issues_before_touching_storage() {
        let auth = LocalAuth::new(MemoryKeyValueStore::new());
        let short = sign_up(&auth, &sign_up_form("a@b.c", "abc", "abc"));
        assert!(short.is_ok());
        if let Ok(outcome) = short {
            assert_eq!(outcome.issues().len(), 1);
            assert_eq!(outcome.issues()[0].field, "password");
        }

        let mismatch = sign_up(&auth, &sign_up_form("a@b.c", "abcdef", "abcdeg"));
        assert!(mismatch.is_ok());
        if let Ok(outcome) = mismatch {
            assert_eq!(outcome.issues()[0].field, "confirm_password");
        }

        let empty = sign_up(&auth, &SignUp::default());
        assert_eq!(empty.ok().map(|outcome| outcome.issues().len()), Some(4));
        assert!(matches!(auth.find_user_by_email("a@b.c"), Ok(None)));
    }

    #[test]
    fn sign_up_starts_a_session_and_blocks_duplicates() {
        let auth = LocalAuth::new(MemoryKeyValueStore::new());
        let session = registered(&auth);
        assert!(session.is_some());
        assert_eq!(auth.current_session().ok().flatten(), session);

        let again = sign_up(&auth, &sign_up_form("ANA@example.com", "secret1", "secret1"));
        assert_eq!(again.err().map(|error| error.code), Some("email_taken".to_string()));
    }

    #[test]
    fn sign_in_distinguishes_bad_credentials() {
        let auth = LocalAuth::new(MemoryKeyValueStore::new());
        assert!(registered(&auth).is_some());
        assert!(auth.clear_session().is_ok());

        let wrong = sign_in(&auth, "ana@example.com", "nope123");
        assert_eq!(
            wrong.err().map(|error| error.code),
            Some("invalid_credentials".to_string())
        );
        let unknown = sign_in(&auth, "bob@example.com", "secret1");
        assert!(unknown.is_err());

        let ok = sign_in(&auth, "ana@example.com", "secret1");
        assert!(ok.as_ref().is_ok_and(|outcome| outcome.is_saved()));
        assert!(auth.current_session().ok().flatten().is_some());
    }

    #[test]
    fn profile_flows_update_and_verify() {
        let auth = LocalAuth::new(MemoryKeyValueStore::new());
        let Some(session) = registered(&auth) else {
            return;
        };

        let updated = update_profile(
            &auth,
            &session,
            &ProfileUpdate {
                name: "Ana Maria".to_string(),
                email: "ana.maria@example.com".to_string(),
            },
        );
        assert!(updated.is_ok());
        let current = auth.current_session().ok().flatten();
        assert_eq!(current.map(|s| s.display_name), Some("Ana Maria".to_string()));

        let wrong_current = change_password(
            &auth,
            &session,
            &PasswordChange {
                current_password: "bad-guess".to_string(),
                new_password: "newsecret".to_string(),
                confirm_password: "newsecret".to_string(),
            },
        );
        assert_eq!(
            wrong_current.err().map(|error| error.code),
            Some("current_password_incorrect".to_string())
        );

        let changed = change_password(
            &auth,
            &session,
            &PasswordChange {
                current_password: "secret1".to_string(),
                new_password: "newsecret".to_string(),
                confirm_password: "newsecret".to_string(),
            },
        );
        assert!(changed.as_ref().is_ok_and(|outcome| outcome.is_saved()));
        assert!(sign_in(&auth, "ana.maria@example.com", "newsecret").is_ok());

        assert!(delete_account(&auth, &session).is_ok());
        assert!(matches!(auth.current_session(), Ok(None)));
        assert_eq!(auth.has_stored_session().ok(), Some(false));
    }
}
