pub mod accounts;
pub mod local;
pub mod password;
pub mod tables;

use crate::ClientResult;
use crate::models::{Session, User, UserId};

pub use accounts::{PasswordChange, ProfileUpdate, SignUp};
pub use local::LocalAuth;
pub use tables::TableAuth;

/// Normalized form used for storing and comparing email addresses.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// User accounts plus the one stored session of this installation.
pub trait AuthBackend {
    /// Fails with `email_taken` when the address is already registered.
    fn register(&self, name: &str, email: &str, password_hash: &str) -> ClientResult<User>;
    fn find_user_by_email(&self, email: &str) -> ClientResult<Option<User>>;
    fn find_user(&self, user_id: UserId) -> ClientResult<Option<User>>;
    fn update_user(&self, user: &User) -> ClientResult<()>;
    fn delete_user(&self, user_id: UserId) -> ClientResult<()>;

    /// Signs `user` in, replacing whatever session was stored before.
    fn start_session(&self, user: &User) -> ClientResult<Session>;
    /// Re-snapshots the signed-in user after an account edit.
    fn refresh_session(&self, user: &User) -> ClientResult<Session> {
        self.start_session(user)
    }
    /// The stored session, but only if it still refers to an existing user.
    fn current_session(&self) -> ClientResult<Option<Session>>;
    /// Whether anything is stored as a session, valid or not.
    fn has_stored_session(&self) -> ClientResult<bool>;
    fn clear_session(&self) -> ClientResult<()>;
}
