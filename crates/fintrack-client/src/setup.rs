use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};

use crate::config::{Backend, Config};
use crate::migrations::{
    EXPECTED_USER_VERSION, REQUIRED_INDEX_NAMES, REQUIRED_META_KEYS, run_pending,
    safe_repair_statement,
};
use crate::state::{
    ensure_data_directory, map_sqlite_error, open_connection, resolve_data_home, store_db_path,
};
use crate::{ClientError, ClientResult};

const INTERNAL_META_COLUMNS: [&str; 2] = ["key", "value"];
const INTERNAL_KV_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];
const USERS_COLUMNS: [&str; 5] = ["id", "name", "email", "password_hash", "created_at"];
const SESSIONS_COLUMNS: [&str; 3] = ["token", "user_id", "created_at"];
const TRANSACTIONS_COLUMNS: [&str; 7] = [
    "id",
    "user_id",
    "description",
    "amount",
    "kind",
    "category",
    "occurred_on",
];
const BUDGETS_COLUMNS: [&str; 7] = [
    "id",
    "user_id",
    "category",
    "limit_amount",
    "spent",
    "period",
    "color",
];
const GOALS_COLUMNS: [&str; 9] = [
    "id",
    "user_id",
    "title",
    "target_amount",
    "current_amount",
    "deadline",
    "category",
    "color",
    "completed",
];

const REQUIRED_CORE_TABLES: [(&str, &[&str]); 7] = [
    ("internal_meta", &INTERNAL_META_COLUMNS),
    ("internal_kv", &INTERNAL_KV_COLUMNS),
    ("users", &USERS_COLUMNS),
    ("sessions", &SESSIONS_COLUMNS),
    ("transactions", &TRANSACTIONS_COLUMNS),
    ("budgets", &BUDGETS_COLUMNS),
    ("goals", &GOALS_COLUMNS),
];

#[derive(Debug, Clone)]
pub struct SetupContext {
    pub db_path: PathBuf,
    pub schema_version: String,
    pub backend: Backend,
}

pub fn ensure_initialized(config: &Config) -> ClientResult<SetupContext> {
    let data_home = resolve_data_home(config.home.as_deref())?;
    ensure_data_directory(&data_home)?;

    let db_path = store_db_path(&data_home);
    let mut connection = open_connection(&db_path)?;

    run_pending(&mut connection).map_err(|error| map_migration_error(&db_path, &error))?;

    verify_core_tables(&connection, &db_path)?;
    repair_safe_objects(&connection, &db_path)?;
    verify_post_repair_objects(&connection, &db_path)?;

    let schema_version = read_schema_version(&connection, &db_path)?;
    tracing::debug!(
        db_path = %db_path.display(),
        backend = %config.backend,
        "data store ready"
    );

    Ok(SetupContext {
        db_path,
        schema_version,
        backend: config.backend,
    })
}

fn map_migration_error(db_path: &Path, error: &rusqlite_migration::Error) -> ClientError {
    match error {
        rusqlite_migration::Error::RusqliteError { query: _, err } => {
            let mapped = map_sqlite_error(db_path, err);
            if mapped.code == "store_locked"
                || mapped.code == "store_corrupt"
                || mapped.code == "store_init_permission_denied"
            {
                mapped
            } else {
                ClientError::migration_failed(db_path, &error.to_string())
            }
        }
        _ => ClientError::migration_failed(db_path, &error.to_string()),
    }
}

fn verify_core_tables(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    for (table_name, required_columns) in REQUIRED_CORE_TABLES {
        if !sqlite_object_exists(connection, "table", table_name, db_path)? {
            return Err(ClientError::store_corrupt(db_path));
        }

        let columns = table_columns(connection, table_name, db_path)?;
        for required_column in required_columns {
            if !columns.iter().any(|column| column == required_column) {
                return Err(ClientError::store_corrupt(db_path));
            }
        }
    }

    Ok(())
}

fn repair_safe_objects(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    // Meta repair is insert-only: value drift is rejected during verification.
    for (meta_key, default_value) in REQUIRED_META_KEYS {
        connection
            .execute(
                "INSERT OR IGNORE INTO internal_meta (key, value) VALUES (?1, ?2)",
                params![meta_key, default_value],
            )
            .map_err(|error| map_sqlite_error(db_path, &error))?;
    }

    for index_name in REQUIRED_INDEX_NAMES {
        if !sqlite_object_exists(connection, "index", index_name, db_path)? {
            let sql = safe_repair_statement(index_name).ok_or_else(|| {
                ClientError::store_failed(db_path, "Missing canonical SQL for index repair.")
            })?;
            tracing::warn!(index = index_name, "recreating missing index");
            connection
                .execute_batch(&sql)
                .map_err(|error| map_sqlite_error(db_path, &error))?;
        }
    }

    Ok(())
}

fn verify_post_repair_objects(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    let user_version = connection
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    if user_version != EXPECTED_USER_VERSION {
        return Err(ClientError::store_corrupt(db_path));
    }

    for (meta_key, expected_value) in REQUIRED_META_KEYS {
        let value = connection
            .query_row(
                "SELECT value FROM internal_meta WHERE key = ?1 LIMIT 1",
                [meta_key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| map_sqlite_error(db_path, &error))?;

        match value {
            Some(actual) if actual == expected_value => {}
            _ => return Err(ClientError::store_corrupt(db_path)),
        }
    }

    for index_name in REQUIRED_INDEX_NAMES {
        if !sqlite_object_exists(connection, "index", index_name, db_path)? {
            return Err(ClientError::store_corrupt(db_path));
        }
    }

    Ok(())
}

fn sqlite_object_exists(
    connection: &Connection,
    object_type: &str,
    object_name: &str,
    db_path: &Path,
) -> ClientResult<bool> {
    let exists = connection
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2 LIMIT 1",
            params![object_type, object_name],
            |_row| Ok(true),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?
        .unwrap_or(false);

    Ok(exists)
}

fn table_columns(
    connection: &Connection,
    table_name: &str,
    db_path: &Path,
) -> ClientResult<Vec<String>> {
    if !is_required_core_table(table_name) {
        return Err(ClientError::store_failed(
            db_path,
            "Refused PRAGMA table inspection for non-core table.",
        ));
    }

    // SAFETY: `table_name` is restricted to the compile-time allowlist from
    // REQUIRED_CORE_TABLES above and never originates from user input.
    let sql = format!("PRAGMA table_info({table_name})");
    let mut statement = connection
        .prepare(&sql)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let column_iter = statement
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut columns: Vec<String> = Vec::new();
    for row in column_iter {
        let column = row.map_err(|error| map_sqlite_error(db_path, &error))?;
        columns.push(column);
    }

    Ok(columns)
}

fn is_required_core_table(table_name: &str) -> bool {
    REQUIRED_CORE_TABLES
        .iter()
        .any(|(required_name, _)| required_name == &table_name)
}

fn read_schema_version(connection: &Connection, db_path: &Path) -> ClientResult<String> {
    let value = connection
        .query_row(
            "SELECT value FROM internal_meta WHERE key = 'schema_version' LIMIT 1",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    Ok(value.unwrap_or_else(|| "v1".to_string()))
}
