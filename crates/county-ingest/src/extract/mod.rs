//! CSV extract reading.

mod header;
mod reader;

pub use header::{normalize_cell, normalize_header};
pub use reader::{CsvLayout, read_csv_frame, read_csv_headers};
