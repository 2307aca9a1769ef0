use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::views::form::FieldIssue;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `fintrack {cmd} --help` for usage."),
            None => "Run `fintrack --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn form_validation_failed(command: &str, issues: Vec<FieldIssue>) -> Self {
        let issue_count = issues.len();
        let noun = if issue_count == 1 { "field needs" } else { "fields need" };
        Self::new(
            "form_validation_failed",
            &format!("{issue_count} {noun} attention. Nothing was saved."),
            vec![
                "Fix the listed fields.".to_string(),
                format!("Run `fintrack {command} --help` to review the accepted values."),
            ],
        )
        .with_data(json!({
            "command": command,
            "issues": issues,
        }))
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            "invalid_credentials",
            "Invalid email or password.",
            vec![
                "Check the email and password and retry `fintrack auth login`.".to_string(),
                "Create an account with `fintrack auth signup` if you do not have one."
                    .to_string(),
            ],
        )
    }

    pub fn email_taken(email: &str) -> Self {
        Self::new(
            "email_taken",
            &format!("An account with email `{email}` already exists."),
            vec![
                "Sign in with `fintrack auth login` instead.".to_string(),
                "Or choose a different email address.".to_string(),
            ],
        )
        .with_data(json!({
            "email": email,
        }))
    }

    pub fn current_password_incorrect() -> Self {
        Self::new(
            "current_password_incorrect",
            "Current password is incorrect.",
            vec!["Retry `fintrack profile password` with your current password.".to_string()],
        )
    }

    pub fn session_required(requested: &str, redirect_to: &str) -> Self {
        Self::new(
            "session_required",
            &format!("`{requested}` requires a signed-in user; redirected to `{redirect_to}`."),
            vec![
                "Run `fintrack auth login --email <email> --password <password>`.".to_string(),
                "Or create an account with `fintrack auth signup`.".to_string(),
            ],
        )
        .with_data(json!({
            "requested": requested,
            "redirect_to": redirect_to,
        }))
    }

    pub fn user_not_found(user_id: i64) -> Self {
        Self::new(
            "user_not_found",
            &format!("User `{user_id}` no longer exists."),
            vec!["Sign in again with `fintrack auth login`.".to_string()],
        )
    }

    pub fn record_not_found(collection: &str, id: i64) -> Self {
        Self::new(
            "record_not_found",
            &format!("No {collection} record with id `{id}` exists for this user."),
            vec![format!("Run `fintrack {collection} list` to see valid ids.")],
        )
        .with_data(json!({
            "collection": collection,
            "id": id,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn internal_password_hash(detail: &str) -> Self {
        Self::new(
            "internal_password_hash_error",
            &format!("Password hashing failed: {detail}"),
            Vec::new(),
        )
    }

    pub fn store_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_permission_denied",
            &format!("Cannot initialize the data store at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `FINTRACK_HOME` to a writable directory."
            )],
        )
    }

    pub fn store_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_locked",
            &format!("Data store is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn store_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_corrupt",
            &format!("Data store appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid fintrack database or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Data store migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn store_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_failed",
            &format!("Data store operation failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }

    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_")
            || matches!(
                self.code.as_str(),
                "store_init_permission_denied"
                    | "store_locked"
                    | "store_corrupt"
                    | "migration_failed"
                    | "store_failed"
            )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::ClientError;
    use crate::views::form::FieldIssue;

    #[test]
    fn form_validation_failure_carries_issues() {
        let error = ClientError::form_validation_failed(
            "transactions add",
            vec![FieldIssue::new("description", "Description is required.")],
        );
        assert_eq!(error.code, "form_validation_failed");
        assert!(error.message.starts_with("1 field needs attention"));
        let issues = error
            .data
            .as_ref()
            .and_then(|data| data.get("issues"))
            .and_then(|issues| issues.as_array())
            .map(Vec::len);
        assert_eq!(issues, Some(1));
        assert!(!error.is_internal());
    }

    #[test]
    fn store_errors_are_internal() {
        assert!(ClientError::store_locked(Path::new("/tmp/x.db")).is_internal());
        assert!(ClientError::internal_serialization("boom").is_internal());
        assert!(!ClientError::invalid_credentials().is_internal());
    }
}
