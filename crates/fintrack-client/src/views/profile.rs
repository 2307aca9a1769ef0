use serde::Serialize;

use crate::auth::AuthBackend;
use crate::auth::accounts::{self, PasswordChange, ProfileUpdate};
use crate::models::Session;
use crate::views::form::FormOutcome;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileDetails {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub member_since: String,
}

/// Account settings for the signed-in user.
pub struct ProfileView<'a, A> {
    auth: &'a A,
    session: Session,
    delete_requested: bool,
}

impl<'a, A: AuthBackend> ProfileView<'a, A> {
    pub fn new(auth: &'a A, session: &Session) -> Self {
        Self {
            auth,
            session: session.clone(),
            delete_requested: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn details(&self) -> ClientResult<ProfileDetails> {
        let user = self
            .auth
            .find_user(self.session.user_id)?
            .ok_or_else(|| ClientError::user_not_found(self.session.user_id))?;
        Ok(ProfileDetails {
            user_id: user.id,
            name: user.name,
            email: user.email,
            member_since: user.created_at,
        })
    }

    pub fn update(&mut self, form: &ProfileUpdate) -> ClientResult<FormOutcome<Session>> {
        let outcome = accounts::update_profile(self.auth, &self.session, form)?;
        if let FormOutcome::Saved(session) = &outcome {
            self.session = session.clone();
        }
        Ok(outcome)
    }

    pub fn change_password(&self, form: &PasswordChange) -> ClientResult<FormOutcome<()>> {
        accounts::change_password(self.auth, &self.session, form)
    }

    pub fn request_delete_account(&mut self) {
        self.delete_requested = true;
    }

    pub fn delete_pending(&self) -> bool {
        self.delete_requested
    }

    pub fn cancel_delete_account(&mut self) {
        self.delete_requested = false;
    }

    /// Deletes the account when a request is pending. Returns whether it did.
    pub fn confirm_delete_account(&mut self) -> ClientResult<bool> {
        if !std::mem::take(&mut self.delete_requested) {
            return Ok(false);
        }
        accounts::delete_account(self.auth, &self.session)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::ProfileView;
    use crate::auth::accounts::{ProfileUpdate, SignUp, sign_up};
    use crate::auth::{AuthBackend, LocalAuth};
    use crate::store::kv::MemoryKeyValueStore;
    use crate::views::form::FormOutcome;

    fn signed_up(auth: &LocalAuth<MemoryKeyValueStore>) -> Option<crate::models::Session> {
        let form = SignUp {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        };
        match sign_up(auth, &form) {
            Ok(FormOutcome::Saved(session)) => Some(session),
            _ => None,
        }
    }

    #[test]
    fn update_refreshes_the_held_session() {
        let auth = LocalAuth::new(MemoryKeyValueStore::new());
        let Some(session) = signed_up(&auth) else {
            return;
        };
        let mut view = ProfileView::new(&auth, &session);

        let blank = view.update(&ProfileUpdate::default());
        assert_eq!(blank.ok().map(|outcome| outcome.issues().len()), Some(2));

        let saved = view.update(&ProfileUpdate {
            name: "Ana B".to_string(),
            email: "ana@example.com".to_string(),
        });
        assert!(saved.is_ok_and(|outcome| outcome.is_saved()));
        assert_eq!(view.session().display_name, "Ana B");
        assert_eq!(view.details().ok().map(|details| details.name), Some("Ana B".to_string()));
    }

    #[test]
    fn account_delete_is_two_phase() {
        let auth = LocalAuth::new(MemoryKeyValueStore::new());
        let Some(session) = signed_up(&auth) else {
            return;
        };
        let mut view = ProfileView::new(&auth, &session);

        assert_eq!(view.confirm_delete_account().ok(), Some(false));
        view.request_delete_account();
        view.cancel_delete_account();
        assert_eq!(view.confirm_delete_account().ok(), Some(false));
        assert!(matches!(auth.find_user(session.user_id), Ok(Some(_))));

        view.request_delete_account();
        assert!(view.delete_pending());
        assert_eq!(view.confirm_delete_account().ok(), Some(true));
        assert!(matches!(auth.find_user(session.user_id), Ok(None)));
        assert!(matches!(auth.current_session(), Ok(None)));
    }
}
