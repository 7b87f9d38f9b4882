//! Output CSV and run manifest.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use sha2::Digest;
use tracing::{debug, info};

use county_ingest::any_to_string;

use crate::error::{PipelineError, Result};
use crate::report::TableReport;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(sha256_hex(&bytes))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::write(parent, e))?;
    }
    Ok(())
}

/// Write `df` as CSV with a header row.
///
/// Nulls are written as empty fields and floats without trailing zeros.
/// Parent directories are created as needed.
pub fn write_table_csv(df: &DataFrame, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let csv_error = |err: csv::Error| PipelineError::WriteCsv {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;

    let header: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    writer.write_record(&header).map_err(csv_error)?;

    let columns = df.get_columns();
    let mut record = Vec::with_capacity(columns.len());
    for idx in 0..df.height() {
        record.clear();
        for column in columns {
            let value = column.get(idx).map_err(|e| PipelineError::WriteCsv {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            record.push(any_to_string(value));
        }
        writer.write_record(&record).map_err(csv_error)?;
    }
    writer
        .flush()
        .map_err(|e| PipelineError::write(path, e))?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "table written"
    );
    Ok(())
}

/// Manifest path for an output file: `<output>.manifest.json`.
pub fn manifest_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".manifest.json");
    PathBuf::from(name)
}

/// Record of one pipeline run, written next to the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub join_mode: String,
    pub inputs: Vec<ManifestInput>,
    pub output: ManifestOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInput {
    pub stage: String,
    pub name: String,
    pub path: String,
    pub sha256: String,
    pub source_rows: usize,
    pub rows: usize,
    #[serde(default)]
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestOutput {
    pub path: String,
    pub sha256: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

impl RunManifest {
    /// Build a manifest for a written output, hashing every input.
    pub fn build(
        join_mode: &str,
        tables: &[TableReport],
        output: &Path,
        table: &DataFrame,
    ) -> Result<Self> {
        let mut inputs = Vec::with_capacity(tables.len());
        for report in tables {
            inputs.push(ManifestInput {
                stage: report.stage.to_string(),
                name: report.name.clone(),
                path: report.path.display().to_string(),
                sha256: sha256_file(&report.path)
                    .map_err(|e| PipelineError::read(&report.path, e))?,
                source_rows: report.source_rows,
                rows: report.rows,
                dropped_rows: report.dropped_rows,
            });
        }
        Ok(Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            join_mode: join_mode.to_string(),
            inputs,
            output: ManifestOutput {
                path: output.display().to_string(),
                sha256: sha256_file(output).map_err(|e| PipelineError::write(output, e))?,
                rows: table.height(),
                columns: table
                    .get_column_names()
                    .into_iter()
                    .map(|name| name.to_string())
                    .collect(),
            },
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| PipelineError::write(path, e))?;
        debug!(path = %path.display(), inputs = self.inputs.len(), "manifest written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;
    use tempfile::TempDir;

    use crate::error::ErrorKind;
    use crate::sources::Stage;

    use super::*;

    #[test]
    fn sha256_of_known_input() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn manifest_sits_next_to_output() {
        assert_eq!(
            manifest_path(Path::new("out/county.csv")),
            PathBuf::from("out/county.csv.manifest.json")
        );
    }

    #[test]
    fn csv_writes_nulls_as_empty_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out.csv");
        let df = DataFrame::new(vec![
            Column::new("state_fips".into(), vec![Some("06"), Some("39")]),
            Column::new("pct".into(), vec![Some(23.4f64), None]),
            Column::new("population".into(), vec![Some(100i64), Some(2500)]),
        ])
        .unwrap();
        write_table_csv(&df, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "state_fips,pct,population\n06,23.4,100\n39,,2500\n"
        );
    }

    #[test]
    fn unreadable_input_is_an_input_error() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("county.csv");
        let df = DataFrame::new(vec![Column::new("state_fips".into(), vec!["06"])]).unwrap();
        write_table_csv(&df, &output).unwrap();
        let tables = vec![TableReport {
            stage: Stage::Acs,
            name: "poverty".to_string(),
            path: dir.path().join("gone.csv"),
            source_rows: 1,
            rows: 1,
            dropped_rows: 0,
            unmapped_states: Vec::new(),
        }];

        let err = RunManifest::build("inner", &tables, &output, &df).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(err.to_string().starts_with("failed to read"));
    }
}
