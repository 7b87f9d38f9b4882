//! Row filtering on a designated group column.

use polars::prelude::*;
use tracing::debug;

use county_ingest::column_strings;

use crate::error::{Result, TransformError};

/// Keep rows whose `column` equals `value`, ignoring case and surrounding
/// whitespace.
pub fn filter_equals(df: &DataFrame, column: &str, value: &str, table: &str) -> Result<DataFrame> {
    if df.column(column).is_err() {
        return Err(TransformError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        });
    }
    let wanted = value.trim();
    let mask: Vec<bool> = column_strings(df, column)?
        .iter()
        .map(|cell| {
            cell.as_deref()
                .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(wanted))
        })
        .collect();
    let filtered = df.filter(&BooleanChunked::new("group".into(), &mask))?;
    debug!(
        table,
        column,
        value = wanted,
        kept = filtered.height(),
        total = df.height(),
        "filtered rows"
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_matching_group_only() {
        let df = DataFrame::new(vec![
            Column::new(
                "age_group".into(),
                vec![Some("18 or Older"), Some("18-25"), Some(" 18 OR OLDER "), None],
            ),
            Column::new("estimate".into(), vec![Some("1"), Some("2"), Some("3"), Some("4")]),
        ])
        .unwrap();
        let out = filter_equals(&df, "age_group", "18 or Older", "ami").unwrap();
        assert_eq!(out.height(), 2);
        let estimates = out.column("estimate").unwrap().str().unwrap();
        assert_eq!(estimates.get(0), Some("1"));
        assert_eq!(estimates.get(1), Some("3"));
    }

    #[test]
    fn missing_group_column_is_schema_error() {
        let df = DataFrame::new(vec![Column::new("x".into(), vec![Some("1")])]).unwrap();
        let err = filter_equals(&df, "age_group", "18 or Older", "ami").unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn { .. }));
    }
}
