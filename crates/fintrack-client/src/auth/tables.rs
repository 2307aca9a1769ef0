use std::rc::Rc;

use rusqlite::{OptionalExtension, Row, params};
use rusqlite::ffi::ErrorCode;
use ulid::Ulid;

use crate::auth::{AuthBackend, normalize_email};
use crate::models::{Session, User, UserId};
use crate::store::database::Database;
use crate::store::kv::{CURRENT_USER_KEY, KeyValueStore, SESSION_TOKEN_KEY, USERS_KEY};
use crate::store::records::now_timestamp;
use crate::{ClientError, ClientResult};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

/// Accounts in the `users` table, live sessions as opaque tokens in `sessions`.
///
/// The token of this installation's session is kept in the key-value store.
#[derive(Debug)]
pub struct TableAuth<K> {
    db: Rc<Database>,
    kv: K,
}

impl<K: KeyValueStore> TableAuth<K> {
    pub fn new(db: Rc<Database>, kv: K) -> Self {
        Self { db, kv }
    }

    fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn revoke_token(&self, token: &str) -> ClientResult<()> {
        self.db
            .connection()
            .execute("DELETE FROM sessions WHERE token = ?1", [token])
            .map_err(|error| self.db.map_error(&error))?;
        Ok(())
    }

    fn query_user(&self, sql: &str, key: &dyn rusqlite::ToSql) -> ClientResult<Option<User>> {
        self.db
            .connection()
            .query_row(sql, [key], Self::user_from_row)
            .optional()
            .map_err(|error| self.db.map_error(&error))
    }
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(error.sqlite_error_code(), Some(ErrorCode::ConstraintViolation))
}

impl<K: KeyValueStore> AuthBackend for TableAuth<K> {
    fn register(&self, name: &str, email: &str, password_hash: &str) -> ClientResult<User> {
        let email = normalize_email(email);
        let created_at = now_timestamp();
        let inserted = self.db.connection().execute(
            "INSERT INTO users (name, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name.trim(), email, password_hash, created_at],
        );
        match inserted {
            Ok(_) => {}
            Err(error) if is_unique_violation(&error) => {
                return Err(ClientError::email_taken(&email));
            }
            Err(error) => return Err(self.db.map_error(&error)),
        }

        Ok(User {
            id: self.db.connection().last_insert_rowid(),
            name: name.trim().to_string(),
            email,
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    fn find_user_by_email(&self, email: &str) -> ClientResult<Option<User>> {
        let email = normalize_email(email);
        self.query_user(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 LIMIT 1"),
            &email,
        )
    }

    fn find_user(&self, user_id: UserId) -> ClientResult<Option<User>> {
        self.query_user(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1 LIMIT 1"),
            &user_id,
        )
    }

    fn update_user(&self, user: &User) -> ClientResult<()> {
        let updated = self.db.connection().execute(
            "UPDATE users SET name = ?2, email = ?3, password_hash = ?4 WHERE id = ?1",
            params![user.id, user.name, normalize_email(&user.email), user.password_hash],
        );
        match updated {
            Ok(0) => Err(ClientError::user_not_found(user.id)),
            Ok(_) => Ok(()),
            Err(error) if is_unique_violation(&error) => Err(ClientError::email_taken(&user.email)),
            Err(error) => Err(self.db.map_error(&error)),
        }
    }

    fn delete_user(&self, user_id: UserId) -> ClientResult<()> {
        self.db
            .connection()
            .execute("DELETE FROM users WHERE id = ?1", [user_id])
            .map_err(|error| self.db.map_error(&error))?;
        Ok(())
    }

    fn start_session(&self, user: &User) -> ClientResult<Session> {
        if let Some(previous) = self.kv.get(SESSION_TOKEN_KEY)? {
            self.revoke_token(&previous)?;
        }
        let token = format!("ses_{}", Ulid::new());
        self.db
            .connection()
            .execute(
                "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
                params![token, user.id, now_timestamp()],
            )
            .map_err(|error| self.db.map_error(&error))?;
        self.kv.set(SESSION_TOKEN_KEY, &token)?;
        Ok(user.session())
    }

    /// The session row joins the live user, so the current token stays valid.
    fn refresh_session(&self, user: &User) -> ClientResult<Session> {
        let live = self.current_session()?;
        if live.is_some_and(|session| session.user_id == user.id) {
            return Ok(user.session());
        }
        self.start_session(user)
    }

    fn current_session(&self) -> ClientResult<Option<Session>> {
        let Some(token) = self.kv.get(SESSION_TOKEN_KEY)? else {
            return Ok(None);
        };
        let user = self.query_user(
            "SELECT u.id, u.name, u.email, u.password_hash, u.created_at
             FROM sessions s JOIN users u ON u.id = s.user_id
             WHERE s.token = ?1 LIMIT 1",
            &token,
        )?;
        Ok(user.map(|user| user.session()))
    }

    fn has_stored_session(&self) -> ClientResult<bool> {
        Ok(self.kv.get(SESSION_TOKEN_KEY)?.is_some())
    }

    fn clear_session(&self) -> ClientResult<()> {
        if let Some(token) = self.kv.get(SESSION_TOKEN_KEY)? {
            self.revoke_token(&token)?;
        }
        self.kv.remove(SESSION_TOKEN_KEY)?;
        // Leftovers from the local backend must not resurrect a session.
        self.kv.remove(CURRENT_USER_KEY)?;
        self.kv.remove(USERS_KEY)
    }
}
