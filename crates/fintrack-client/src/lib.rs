pub mod aggregate;
pub mod auth;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod migrations;
pub mod models;
pub mod session;
pub mod setup;
pub mod state;
pub mod store;
pub mod views;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
