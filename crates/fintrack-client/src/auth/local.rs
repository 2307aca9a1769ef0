use serde_json::Value;

use crate::auth::{AuthBackend, normalize_email};
use crate::models::{Session, User, UserId};
use crate::store::kv::{CURRENT_USER_KEY, KeyValueStore, USERS_KEY, read_json, write_json};
use crate::store::records::{now_millis, now_timestamp};
use crate::{ClientError, ClientResult};

/// Accounts kept as a JSON array under `users`, the session under `currentUser`.
#[derive(Debug)]
pub struct LocalAuth<K> {
    kv: K,
}

impl<K: KeyValueStore> LocalAuth<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    fn load_users(&self) -> ClientResult<Vec<User>> {
        let Some(elements) = read_json::<K, Vec<Value>>(&self.kv, USERS_KEY)? else {
            return Ok(Vec::new());
        };
        let mut users = Vec::with_capacity(elements.len());
        for (position, element) in elements.into_iter().enumerate() {
            match serde_json::from_value::<User>(element) {
                Ok(user) => users.push(user),
                Err(error) => {
                    tracing::warn!(position, error = %error, "dropping unreadable user entry");
                }
            }
        }
        Ok(users)
    }

    fn save_users(&self, users: &[User]) -> ClientResult<()> {
        write_json(&self.kv, USERS_KEY, users)
    }
}

impl<K: KeyValueStore> AuthBackend for LocalAuth<K> {
    fn register(&self, name: &str, email: &str, password_hash: &str) -> ClientResult<User> {
        let email = normalize_email(email);
        let mut users = self.load_users()?;
        if users.iter().any(|user| normalize_email(&user.email) == email) {
            return Err(ClientError::email_taken(&email));
        }

        let now = now_millis();
        let id = match users.iter().map(|user| user.id).max() {
            Some(highest) if highest >= now => highest.saturating_add(1),
            _ => now,
        };
        let user = User {
            id,
            name: name.trim().to_string(),
            email,
            password_hash: password_hash.to_string(),
            created_at: now_timestamp(),
        };
        users.push(user.clone());
        self.save_users(&users)?;
        Ok(user)
    }

    fn find_user_by_email(&self, email: &str) -> ClientResult<Option<User>> {
        let email = normalize_email(email);
        Ok(self
            .load_users()?
            .into_iter()
            .find(|user| normalize_email(&user.email) == email))
    }

    fn find_user(&self, user_id: UserId) -> ClientResult<Option<User>> {
        Ok(self.load_users()?.into_iter().find(|user| user.id == user_id))
    }

    fn update_user(&self, updated: &User) -> ClientResult<()> {
        let mut users = self.load_users()?;
        let Some(slot) = users.iter_mut().find(|user| user.id == updated.id) else {
            return Err(ClientError::user_not_found(updated.id));
        };
        *slot = updated.clone();
        self.save_users(&users)
    }

    fn delete_user(&self, user_id: UserId) -> ClientResult<()> {
        let mut users = self.load_users()?;
        users.retain(|user| user.id != user_id);
        self.save_users(&users)
    }

    fn start_session(&self, user: &User) -> ClientResult<Session> {
        let session = user.session();
        write_json(&self.kv, CURRENT_USER_KEY, &session)?;
        Ok(session)
    }

    fn current_session(&self) -> ClientResult<Option<Session>> {
        let Some(stored) = read_json::<K, Session>(&self.kv, CURRENT_USER_KEY)? else {
            return Ok(None);
        };
        let Some(user) = self.find_user_by_email(&stored.email)? else {
            tracing::debug!(email = %stored.email, "stored session has no matching user");
            return Ok(None);
        };
        if user.id != stored.user_id {
            tracing::debug!(user_id = stored.user_id, "stored session id does not match user");
            return Ok(None);
        }
        Ok(Some(user.session()))
    }

    fn has_stored_session(&self) -> ClientResult<bool> {
        Ok(self.kv.get(CURRENT_USER_KEY)?.is_some())
    }

    fn clear_session(&self) -> ClientResult<()> {
        self.kv.remove(CURRENT_USER_KEY)
    }
}
