//! CSV file reading with explicit header offsets.
//!
//! Source extracts rarely start with their header: SAMHSA tables carry a few
//! descriptive rows above it, ACS tables a label row below it. Every cell is
//! read as text; typing happens later, against the column allowlist.

use std::collections::BTreeSet;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

use super::header::{decode_cell, normalize_cell, normalize_header};

/// Where the header sits and which cell values mean "missing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvLayout {
    /// Records above the header row.
    pub skip_rows: usize,
    /// Records between the header row and the first data row.
    pub skip_rows_after_header: usize,
    /// Cell values read as null (compared after trimming).
    pub null_values: Vec<String>,
}

impl CsvLayout {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_skip_rows(mut self, rows: usize) -> Self {
        self.skip_rows = rows;
        self
    }

    #[must_use]
    pub fn with_skip_rows_after_header(mut self, rows: usize) -> Self {
        self.skip_rows_after_header = rows;
        self
    }

    #[must_use]
    pub fn with_null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Reads only the header row of a CSV file.
pub fn read_csv_headers(path: &Path, layout: &CsvLayout) -> Result<Vec<String>> {
    let mut records = open_records(path)?;
    let header = next_header(&mut records, path, layout)?;
    Ok(header.into_iter().map(|(_, name)| name).collect())
}

/// Reads a CSV file into a DataFrame of nullable string columns.
///
/// Columns with a blank header are dropped. Blank rows are skipped. Short
/// rows are padded with nulls, surplus cells are ignored. Only kept cells are
/// decoded; invalid UTF-8 is read as Windows-1252.
pub fn read_csv_frame(path: &Path, layout: &CsvLayout) -> Result<DataFrame> {
    let mut records = open_records(path)?;
    let header = next_header(&mut records, path, layout)?;

    for _ in 0..layout.skip_rows_after_header {
        if records.next().is_none() {
            break;
        }
    }

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); header.len()];
    let mut skipped_blank = 0usize;
    for record in records {
        let record = parse_record(record, path)?;
        if record.iter().all(|cell| cell.trim_ascii().is_empty()) {
            skipped_blank += 1;
            continue;
        }
        for (slot, (idx, _)) in values.iter_mut().zip(&header) {
            let cell = decode_cell(record.get(*idx).unwrap_or_default());
            slot.push(normalize_cell(&cell, &layout.null_values));
        }
    }

    let height = values.first().map_or(0, Vec::len);
    if height == 0 {
        return Err(IngestError::NoDataRows {
            path: path.to_path_buf(),
        });
    }
    debug!(
        path = %path.display(),
        rows = height,
        columns = header.len(),
        skipped_blank,
        "read csv"
    );

    let columns: Vec<Column> = header
        .iter()
        .zip(values)
        .map(|((_, name), column)| Column::new(name.as_str().into(), column))
        .collect();
    Ok(DataFrame::new(columns)?)
}

type Records = csv::ByteRecordsIntoIter<std::fs::File>;

fn open_records(path: &Path) -> Result<Records> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::file_open(path, e))?;
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    Ok(reader.into_byte_records())
}

fn parse_record(record: csv::Result<ByteRecord>, path: &Path) -> Result<ByteRecord> {
    record.map_err(|e| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Skips the leading rows and returns the non-blank header cells with their
/// record positions.
fn next_header(
    records: &mut Records,
    path: &Path,
    layout: &CsvLayout,
) -> Result<Vec<(usize, String)>> {
    for _ in 0..layout.skip_rows {
        if let Some(record) = records.next() {
            parse_record(record, path)?;
        }
    }
    let Some(record) = records.next() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
            skipped: layout.skip_rows,
        });
    };
    let record = parse_record(record, path)?;

    let mut seen = BTreeSet::new();
    let mut header = Vec::with_capacity(record.len());
    for (idx, raw) in record.iter().enumerate() {
        let name = normalize_header(&decode_cell(raw));
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.clone()) {
            return Err(IngestError::DuplicateColumn {
                column: name,
                path: path.to_path_buf(),
            });
        }
        header.push((idx, name));
    }
    if header.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
            skipped: layout.skip_rows,
        });
    }
    Ok(header)
}
