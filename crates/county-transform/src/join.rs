//! Keyed joins between named tables.
//!
//! Every join checks its preconditions before handing off to Polars: the key
//! columns must exist on both sides, the right table holds at most one row
//! per key and the two tables may share no other column. Key columns are
//! coalesced, so each appears once in the result.

use std::collections::HashSet;

use polars::prelude::*;
use tracing::{debug, info};

use county_ingest::column_strings;

use county_model::JoinMode;

use crate::error::{Result, TransformError};
use crate::frame::TableFrame;

fn join_type(mode: JoinMode) -> JoinType {
    match mode {
        JoinMode::Inner => JoinType::Inner,
        JoinMode::Left => JoinType::Left,
    }
}

/// Fail when two rows of `table` share a key. Rows with a null key part are
/// ignored; they never match in a join.
pub fn ensure_unique_keys(table: &TableFrame, keys: &[&str]) -> Result<()> {
    let columns = keys
        .iter()
        .map(|key| column_strings(&table.data, key))
        .collect::<PolarsResult<Vec<_>>>()?;
    let mut seen = HashSet::with_capacity(table.record_count());
    for idx in 0..table.record_count() {
        let Some(values) = columns
            .iter()
            .map(|column| column[idx].as_deref())
            .collect::<Option<Vec<&str>>>()
        else {
            continue;
        };
        if !seen.insert(values.clone()) {
            let key = keys
                .iter()
                .zip(&values)
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(TransformError::DuplicateKey {
                table: table.name.clone(),
                key,
            });
        }
    }
    Ok(())
}

/// Join `right` onto `left` on `keys`.
///
/// The result keeps the left table's name. With [`JoinMode::Left`] every
/// left row survives and unmatched right columns are null.
pub fn join_frames(
    left: &TableFrame,
    right: &TableFrame,
    keys: &[&str],
    mode: JoinMode,
) -> Result<TableFrame> {
    for key in keys {
        if !left.has_column(key) {
            return Err(TransformError::MissingJoinKey {
                key: (*key).to_string(),
                side: "left",
                table: left.name.clone(),
            });
        }
        if !right.has_column(key) {
            return Err(TransformError::MissingJoinKey {
                key: (*key).to_string(),
                side: "right",
                table: right.name.clone(),
            });
        }
    }
    ensure_unique_keys(right, keys)?;
    let left_columns = left.column_names();
    for column in right.column_names() {
        if keys.contains(&column.as_str()) {
            continue;
        }
        if left_columns.contains(&column) {
            return Err(TransformError::DuplicateColumn {
                column,
                left: left.name.clone(),
                right: right.name.clone(),
            });
        }
    }

    let on: Vec<Expr> = keys.iter().map(|key| col(*key)).collect();
    let joined = left
        .data
        .clone()
        .lazy()
        .join(
            right.data.clone().lazy(),
            on.clone(),
            on,
            JoinArgs::new(join_type(mode)),
        )
        .collect()?;
    debug!(
        left = %left.name,
        right = %right.name,
        mode = %mode,
        left_rows = left.record_count(),
        right_rows = right.record_count(),
        rows = joined.height(),
        "joined tables"
    );

    Ok(TableFrame::new(left.name.clone(), joined))
}

/// Fold `tables` into one table, joining each onto the accumulated result.
pub fn join_all(
    tables: &[TableFrame],
    keys: &[&str],
    mode: JoinMode,
    what: &str,
) -> Result<TableFrame> {
    let Some((first, rest)) = tables.split_first() else {
        return Err(TransformError::NoTables {
            what: what.to_string(),
        });
    };
    ensure_unique_keys(first, keys)?;
    let mut acc = TableFrame::new(what, first.data.clone());
    for table in rest {
        acc = join_frames(&acc, table, keys, mode)?;
    }
    info!(
        what,
        tables = tables.len(),
        rows = acc.record_count(),
        columns = acc.data.width(),
        "combined tables"
    );
    Ok(acc)
}

/// Sort a table by `keys`, ascending.
pub fn sort_by_keys(df: &DataFrame, keys: &[&str]) -> Result<DataFrame> {
    let by: Vec<PlSmallStr> = keys.iter().map(|key| PlSmallStr::from(*key)).collect();
    Ok(df.sort(by, SortMultipleOptions::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, columns: Vec<(&str, Vec<Option<&str>>)>) -> TableFrame {
        let cols: Vec<Column> = columns
            .into_iter()
            .map(|(n, values)| Column::new(n.into(), values))
            .collect();
        TableFrame::new(name, DataFrame::new(cols).unwrap())
    }

    fn income() -> TableFrame {
        table(
            "income",
            vec![
                ("state_fips", vec![Some("06"), Some("06")]),
                ("county_fips", vec![Some("001"), Some("037")]),
                ("median_income", vec![Some("90000"), Some("61000")]),
            ],
        )
    }

    fn poverty() -> TableFrame {
        table(
            "poverty",
            vec![
                ("state_fips", vec![Some("06")]),
                ("county_fips", vec![Some("037")]),
                ("poverty_rate", vec![Some("16.3")]),
            ],
        )
    }

    const KEYS: [&str; 2] = ["state_fips", "county_fips"];

    #[test]
    fn inner_join_keeps_matching_keys() {
        let joined = join_frames(&income(), &poverty(), &KEYS, JoinMode::Inner).unwrap();
        assert_eq!(joined.name, "income");
        assert_eq!(joined.record_count(), 1);
        assert_eq!(
            joined.column_names(),
            vec!["state_fips", "county_fips", "median_income", "poverty_rate"]
        );
    }

    #[test]
    fn left_join_keeps_unmatched_rows() {
        let joined = join_frames(&income(), &poverty(), &KEYS, JoinMode::Left).unwrap();
        assert_eq!(joined.record_count(), 2);
        let sorted = sort_by_keys(&joined.data, &KEYS).unwrap();
        let rate = sorted.column("poverty_rate").unwrap().str().unwrap();
        assert_eq!(rate.get(0), None);
        assert_eq!(rate.get(1), Some("16.3"));
    }

    #[test]
    fn missing_key_is_reported_with_side() {
        let right = table("bad", vec![("state_fips", vec![Some("06")])]);
        let err = join_frames(&income(), &right, &KEYS, JoinMode::Inner).unwrap_err();
        assert!(matches!(
            err,
            TransformError::MissingJoinKey { side: "right", ref key, .. } if key == "county_fips"
        ));
    }

    #[test]
    fn overlapping_value_columns_are_rejected() {
        let err = join_frames(&income(), &income(), &KEYS, JoinMode::Inner).unwrap_err();
        assert!(matches!(
            err,
            TransformError::DuplicateColumn { ref column, .. } if column == "median_income"
        ));
    }

    #[test]
    fn join_all_requires_tables() {
        let err = join_all(&[], &KEYS, JoinMode::Inner, "acs").unwrap_err();
        assert!(matches!(err, TransformError::NoTables { .. }));
        let combined = join_all(&[income(), poverty()], &KEYS, JoinMode::Inner, "acs").unwrap();
        assert_eq!(combined.name, "acs");
        assert_eq!(combined.record_count(), 1);
    }

    #[test]
    fn duplicate_right_keys_are_rejected() {
        let right = table(
            "smi",
            vec![
                ("state_fips", vec![Some("35"), Some("35")]),
                ("county_fips", vec![Some("013"), Some("013")]),
                ("pct_smi", vec![Some("4.0"), Some("5.0")]),
            ],
        );
        let err = join_frames(&income(), &right, &KEYS, JoinMode::Left).unwrap_err();
        match err {
            TransformError::DuplicateKey { table, key } => {
                assert_eq!(table, "smi");
                assert_eq!(key, "state_fips=35, county_fips=013");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_keys_in_first_table_are_rejected() {
        let first = table(
            "ami",
            vec![
                ("state_fips", vec![Some("06"), Some("06")]),
                ("county_fips", vec![Some("037"), Some("037")]),
            ],
        );
        let err = join_all(&[first], &KEYS, JoinMode::Inner, "samhsa").unwrap_err();
        assert!(matches!(err, TransformError::DuplicateKey { ref table, .. } if table == "ami"));
    }

    #[test]
    fn null_key_parts_do_not_count_as_duplicates() {
        let right = table(
            "poverty",
            vec![
                ("state_fips", vec![Some("06"), Some("06")]),
                ("county_fips", vec![None, None]),
                ("poverty_rate", vec![Some("1"), Some("2")]),
            ],
        );
        assert!(ensure_unique_keys(&right, &KEYS).is_ok());
    }
}
