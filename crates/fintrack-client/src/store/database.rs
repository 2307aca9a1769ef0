use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::ClientError;
use crate::ClientResult;
use crate::setup::SetupContext;
use crate::state::{map_sqlite_error, open_connection};

/// An open handle on the initialized data store file.
#[derive(Debug)]
pub struct Database {
    connection: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open(context: &SetupContext) -> ClientResult<Self> {
        let connection = open_connection(&context.db_path)?;
        Ok(Self {
            connection,
            path: context.db_path.clone(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn map_error(&self, error: &rusqlite::Error) -> ClientError {
        map_sqlite_error(&self.path, error)
    }
}
