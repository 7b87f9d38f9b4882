use thiserror::Error;

/// Errors raised while parsing geographic identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid FIPS code '{value}': {reason}")]
    InvalidFips { value: String, reason: String },

    #[error("malformed geographic identifier '{value}': {reason}")]
    MalformedGeoId { value: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
