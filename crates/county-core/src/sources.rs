//! Source file layouts and required columns.
//!
//! Shared by the pipeline stages and by the input check, so both agree on
//! where each file's header sits and which columns it must carry.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;

use county_config::{AcsConfig, AcsTable, PipelineConfig, SamhsaConfig, SourceTable, resolve_input};
use county_ingest::{CsvLayout, IngestError, read_csv_frame};

use crate::error::Result;

/// Which stage reads a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Geography,
    Samhsa,
    Acs,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Geography => "geography",
            Self::Samhsa => "samhsa",
            Self::Acs => "acs",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured input, resolved against the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub stage: Stage,
    pub name: String,
    pub path: PathBuf,
    pub layout: CsvLayout,
    /// Source columns the stage selects.
    pub required: Vec<String>,
}

pub(crate) fn reference_source(name: &str, table: &SourceTable, data_dir: &Path) -> SourceFile {
    SourceFile {
        stage: Stage::Geography,
        name: name.to_string(),
        path: resolve_input(data_dir, &table.file),
        layout: CsvLayout::new().with_skip_rows(table.skip_rows),
        required: table.columns.iter().map(|spec| spec.source.clone()).collect(),
    }
}

pub(crate) fn samhsa_layout(config: &SamhsaConfig) -> CsvLayout {
    CsvLayout::new()
        .with_skip_rows(config.skip_rows)
        .with_null_values(config.null_values.iter().cloned())
}

pub(crate) fn samhsa_required(config: &SamhsaConfig) -> Vec<String> {
    vec![
        config.state_column.clone(),
        config.region_column.clone(),
        config.group_column.clone(),
        config.estimate_column.clone(),
    ]
}

pub(crate) fn acs_layout(config: &AcsConfig) -> CsvLayout {
    CsvLayout::new()
        .with_skip_rows_after_header(config.skip_rows_after_header)
        .with_null_values(config.null_values.iter().cloned())
}

pub(crate) fn acs_required(config: &AcsConfig, table: &AcsTable) -> Vec<String> {
    std::iter::once(config.geo_id_column.clone())
        .chain(table.columns.iter().map(|spec| spec.source.clone()))
        .collect()
}

/// Every configured input in pipeline order.
pub fn source_files(config: &PipelineConfig, data_dir: &Path) -> Vec<SourceFile> {
    let mut sources = vec![reference_source("county", &config.geography.county, data_dir)];
    if let Some(tract) = &config.geography.tract {
        sources.push(reference_source("tract", tract, data_dir));
    }
    for table in &config.samhsa.tables {
        sources.push(SourceFile {
            stage: Stage::Samhsa,
            name: table.name.clone(),
            path: resolve_input(data_dir, &table.file),
            layout: samhsa_layout(&config.samhsa),
            required: samhsa_required(&config.samhsa),
        });
    }
    for table in &config.acs.tables {
        sources.push(SourceFile {
            stage: Stage::Acs,
            name: table.name.clone(),
            path: resolve_input(data_dir, &table.file),
            layout: acs_layout(&config.acs),
            required: acs_required(&config.acs, table),
        });
    }
    sources
}

impl SourceFile {
    /// Read the file and check that every required column is present.
    pub fn read(&self) -> Result<DataFrame> {
        let df = read_csv_frame(&self.path, &self.layout)?;
        if let Some(column) = self
            .required
            .iter()
            .find(|column| df.column(column.as_str()).is_err())
        {
            return Err(IngestError::MissingColumn {
                column: column.clone(),
                path: self.path.clone(),
            }
            .into());
        }
        Ok(df)
    }

    /// Required columns absent from `headers`.
    pub fn missing_columns(&self, headers: &[String]) -> Vec<String> {
        self.required
            .iter()
            .filter(|column| !headers.contains(column))
            .cloned()
            .collect()
    }
}
