use thiserror::Error;

/// Errors raised while reshaping or joining tables.
#[derive(Debug, Error)]
pub enum TransformError {
    // === Geography ===
    #[error("{table}: invalid FIPS value '{value}' in column '{column}': {reason}")]
    InvalidFips {
        table: String,
        column: String,
        value: String,
        reason: String,
    },

    #[error("{table}: malformed geographic identifier '{value}': {reason}")]
    MalformedGeoId {
        table: String,
        value: String,
        reason: String,
    },

    #[error("{table}: state name '{name}' has no FIPS code")]
    UnmappedState { table: String, name: String },

    // === Schema ===
    #[error("{table}: column '{column}' not found")]
    MissingColumn { table: String, column: String },

    #[error("join key '{key}' missing from {side} table '{table}'")]
    MissingJoinKey {
        key: String,
        side: &'static str,
        table: String,
    },

    #[error("column '{column}' present in both '{left}' and '{right}'")]
    DuplicateColumn {
        column: String,
        left: String,
        right: String,
    },

    #[error("{table}: more than one row for join key ({key})")]
    DuplicateKey { table: String, key: String },

    #[error("no {what} tables to join")]
    NoTables { what: String },

    // === DataFrame ===
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
