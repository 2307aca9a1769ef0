use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ClientError, ClientResult};

/// Result of one `fintrack` command, shaped the same for every route.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

impl SuccessEnvelope {
    pub fn new<T: Serialize>(command: &str, data: T) -> ClientResult<Self> {
        let data = serde_json::to_value(data)
            .map_err(|err| ClientError::internal_serialization(&err.to_string()))?;
        Ok(Self {
            ok: true,
            command: command.to_string(),
            version: API_VERSION.to_string(),
            data,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    pub version: String,
    pub error: ErrorContract,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContract {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub internal: bool,
}

impl From<&ClientError> for FailureEnvelope {
    fn from(error: &ClientError) -> Self {
        Self {
            ok: false,
            version: API_VERSION.to_string(),
            error: ErrorContract {
                code: error.code.clone(),
                message: error.message.clone(),
                recovery_steps: error.recovery_steps.clone(),
                internal: error.is_internal(),
            },
            data: error.data.clone(),
        }
    }
}

pub fn success<T: Serialize>(command: &str, data: T) -> ClientResult<SuccessEnvelope> {
    SuccessEnvelope::new(command, data)
}
