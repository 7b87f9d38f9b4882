//! Input verification without running the pipeline.

use std::path::Path;

use tracing::debug;

use county_config::PipelineConfig;
use county_ingest::{IngestError, read_csv_headers};

use crate::sources::{SourceFile, source_files};

/// Outcome of checking one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Header read and every required column present.
    Ok { columns: usize },
    /// File does not exist.
    Missing,
    /// File exists but its header could not be read.
    Unreadable { message: String },
    /// Header lacks required columns.
    MissingColumns { columns: Vec<String> },
}

impl CheckStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok { .. } => "ok",
            Self::Missing => "missing",
            Self::Unreadable { .. } => "unreadable",
            Self::MissingColumns { .. } => "missing columns",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCheck {
    pub source: SourceFile,
    pub status: CheckStatus,
}

/// Check every configured input under `data_dir`.
pub fn check_inputs(config: &PipelineConfig, data_dir: &Path) -> Vec<InputCheck> {
    source_files(config, data_dir)
        .into_iter()
        .map(|source| {
            let status = check_source(&source);
            debug!(
                stage = %source.stage,
                table = %source.name,
                status = status.label(),
                "input checked"
            );
            InputCheck { source, status }
        })
        .collect()
}

fn check_source(source: &SourceFile) -> CheckStatus {
    match read_csv_headers(&source.path, &source.layout) {
        Ok(headers) => {
            let missing = source.missing_columns(&headers);
            if missing.is_empty() {
                CheckStatus::Ok {
                    columns: headers.len(),
                }
            } else {
                CheckStatus::MissingColumns { columns: missing }
            }
        }
        Err(IngestError::FileNotFound { .. }) => CheckStatus::Missing,
        Err(err) => CheckStatus::Unreadable {
            message: err.to_string(),
        },
    }
}
