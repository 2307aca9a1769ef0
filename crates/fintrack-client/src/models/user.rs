use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// A registered account. Only the argon2 PHC string of the password is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

impl User {
    pub fn session(&self) -> Session {
        Session {
            user_id: self.id,
            display_name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Immutable snapshot of the signed-in user.
///
/// Stored under `currentUser` in the local backend using the `{id, name, email}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "id")]
    pub user_id: UserId,
    #[serde(rename = "name")]
    pub display_name: String,
    pub email: String,
}
