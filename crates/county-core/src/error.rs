//! Pipeline error type.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use county_config::ConfigError;
use county_ingest::IngestError;
use county_transform::TransformError;

/// Coarse classification used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, unreadable or malformed input file.
    Input,
    /// Unresolvable geographic mapping.
    Geography,
    /// Expected column or join key absent, or column collision.
    Schema,
    /// Invalid or unreadable configuration.
    Config,
    /// Failure writing the table or the manifest.
    Output,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Geography => "geography",
            Self::Schema => "schema",
            Self::Config => "config",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {message}")]
    WriteCsv { path: PathBuf, message: String },

    #[error("failed to serialize run manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Ingest(IngestError::MissingColumn { .. }) => ErrorKind::Schema,
            Self::Ingest(_) => ErrorKind::Input,
            Self::Transform(err) => match err {
                TransformError::InvalidFips { .. }
                | TransformError::MalformedGeoId { .. }
                | TransformError::UnmappedState { .. } => ErrorKind::Geography,
                TransformError::MissingColumn { .. }
                | TransformError::MissingJoinKey { .. }
                | TransformError::DuplicateColumn { .. }
                | TransformError::DuplicateKey { .. }
                | TransformError::NoTables { .. }
                | TransformError::DataFrame { .. } => ErrorKind::Schema,
            },
            Self::Read { .. } => ErrorKind::Input,
            Self::Write { .. } | Self::WriteCsv { .. } | Self::Manifest(_) => ErrorKind::Output,
        }
    }

    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<polars::prelude::PolarsError> for PipelineError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Transform(TransformError::from(err))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_error_taxonomy() {
        let missing = PipelineError::from(IngestError::FileNotFound {
            path: PathBuf::from("a.csv"),
        });
        assert_eq!(missing.kind(), ErrorKind::Input);

        let schema = PipelineError::from(IngestError::MissingColumn {
            column: "GEO_ID".to_string(),
            path: PathBuf::from("a.csv"),
        });
        assert_eq!(schema.kind(), ErrorKind::Schema);

        let geo = PipelineError::from(TransformError::UnmappedState {
            table: "ami".to_string(),
            name: "Total U.S.".to_string(),
        });
        assert_eq!(geo.kind(), ErrorKind::Geography);
        assert_eq!(geo.kind().to_string(), "geography");

        let config = PipelineError::from(ConfigError::Invalid {
            message: "no tables".to_string(),
        });
        assert_eq!(config.kind(), ErrorKind::Config);
    }
}
