//! Run results.

use std::path::PathBuf;

use polars::prelude::DataFrame;

use county_model::JoinMode;
use county_transform::TableFrame;

use crate::sources::Stage;

/// Row accounting for one source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub stage: Stage,
    pub name: String,
    pub path: PathBuf,
    /// Data rows in the file.
    pub source_rows: usize,
    /// Rows after filtering, selection and state mapping.
    pub rows: usize,
    /// Rows dropped for unmapped state names.
    pub dropped_rows: usize,
    /// Distinct state names without a FIPS code.
    pub unmapped_states: Vec<String>,
}

/// A stage's output table with its accounting.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub frame: TableFrame,
    pub report: TableReport,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub data_dir: PathBuf,
    pub join_mode: JoinMode,
    pub tables: Vec<TableReport>,
    /// Counties in the county-to-region bridge.
    pub bridge_counties: usize,
    /// Rows of the combined SAMHSA table.
    pub indicator_rows: usize,
    /// Rows of the combined ACS table.
    pub acs_rows: usize,
    /// The final county table, sorted by county.
    pub table: DataFrame,
    /// Written CSV, `None` on a dry run.
    pub output: Option<PathBuf>,
    /// Written manifest, when requested.
    pub manifest: Option<PathBuf>,
}

impl PipelineReport {
    pub fn output_rows(&self) -> usize {
        self.table.height()
    }

    pub fn output_columns(&self) -> Vec<String> {
        self.table
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn dropped_rows(&self) -> usize {
        self.tables.iter().map(|table| table.dropped_rows).sum()
    }
}
