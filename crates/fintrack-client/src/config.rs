use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::state::HOME_ENV_VAR;
use crate::{ClientError, ClientResult};

pub const BACKEND_ENV_VAR: &str = "FINTRACK_BACKEND";

/// Which persistence flavor backs the record store and the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Every collection is a JSON value under a string key.
    #[default]
    Local,
    /// Typed tables plus a token-based live session.
    Tables,
}

impl Backend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Tables => "tables",
        }
    }

    pub fn parse(value: &str) -> ClientResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "tables" => Ok(Self::Tables),
            other => Err(ClientError::invalid_argument_with_recovery(
                &format!("Unknown backend `{other}`."),
                vec![format!(
                    "Set `{BACKEND_ENV_VAR}` or `--backend` to `local` or `tables`."
                )],
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub home: Option<PathBuf>,
    pub backend: Backend,
}

impl Config {
    pub fn from_env() -> ClientResult<Self> {
        let home = std::env::var_os(HOME_ENV_VAR).map(PathBuf::from);
        let backend = match std::env::var(BACKEND_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => Backend::parse(&value)?,
            _ => Backend::default(),
        };
        Ok(Self { home, backend })
    }

    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        if home.is_some() {
            self.home = home;
        }
        self
    }

    pub fn with_backend(mut self, backend: Option<Backend>) -> Self {
        if let Some(value) = backend {
            self.backend = value;
        }
        self
    }
}
