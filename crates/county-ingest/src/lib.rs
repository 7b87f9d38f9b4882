//! Source extract ingestion.
//!
//! Reads SAMHSA and ACS CSV extracts into Polars DataFrames of nullable
//! string columns. Layout quirks of the sources are handled here:
//!
//! - **Header offsets**: descriptive rows above the header, label rows below it
//! - **Sentinel nulls**: `(X)`, `-`, `*` and friends read as missing values
//! - **Cell helpers**: lenient numeric and percentage parsing for later typing
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use county_ingest::{CsvLayout, read_csv_frame};
//!
//! let layout = CsvLayout::new()
//!     .with_skip_rows_after_header(1)
//!     .with_null_values(["(X)", "-"]);
//! let df = read_csv_frame(Path::new("data/raw/acs/ACSST5Y2016.S1701_data.csv"), &layout)?;
//! ```

mod error;
mod extract;
mod polars_utils;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use extract::{CsvLayout, normalize_cell, normalize_header, read_csv_frame, read_csv_headers};

// === Cell Helpers ===
pub use polars_utils::{
    any_to_string, column_strings, format_numeric, parse_f64, parse_numeric, parse_percent,
};
