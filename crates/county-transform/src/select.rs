//! Allowlist selection.
//!
//! Applies a table's rename map: every [`ColumnSpec`] pulls one source
//! column, runs its value transform, coerces it to the target type and stores
//! it under the semantic name. Columns without a spec do not survive.

use polars::prelude::*;
use tracing::{debug, warn};

use county_ingest::{column_strings, parse_numeric, parse_percent};
use county_model::{ColumnKind, ColumnSpec, ColumnTransform, ModelError, pad_fips};

use crate::error::{Result, TransformError};

/// Select, rename and type the allowlisted columns of `df`.
///
/// Output columns follow the order of `specs`.
pub fn select_columns(df: &DataFrame, specs: &[ColumnSpec], table: &str) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(specs.len());
    for spec in specs {
        if df.column(&spec.source).is_err() {
            return Err(TransformError::MissingColumn {
                table: table.to_string(),
                column: spec.source.clone(),
            });
        }
        let raw = column_strings(df, &spec.source)?;
        let transformed = apply_transform(raw, spec, table)?;
        let (column, unparsed) = coerce(&spec.target, transformed, spec.kind, spec.transform);
        if unparsed > 0 {
            warn!(
                table,
                column = %spec.target,
                source = %spec.source,
                unparsed,
                kind = %spec.kind,
                "values could not be parsed and were set to null"
            );
        }
        debug!(table, source = %spec.source, target = %spec.target, "selected column");
        columns.push(column);
    }
    Ok(DataFrame::new(columns)?)
}

fn apply_transform(
    values: Vec<Option<String>>,
    spec: &ColumnSpec,
    table: &str,
) -> Result<Vec<Option<String>>> {
    match spec.transform {
        Some(ColumnTransform::ZeroPad(width)) => values
            .into_iter()
            .map(|value| match value {
                Some(raw) => pad_fips(&raw, width).map(Some).map_err(|err| {
                    let reason = match err {
                        ModelError::InvalidFips { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    TransformError::InvalidFips {
                        table: table.to_string(),
                        column: spec.source.clone(),
                        value: raw,
                        reason,
                    }
                }),
                None => Ok(None),
            })
            .collect(),
        Some(ColumnTransform::Trim) => Ok(values
            .into_iter()
            .map(|value| value.map(|v| v.split_whitespace().collect::<Vec<_>>().join(" ")))
            .collect()),
        Some(ColumnTransform::Percent) if spec.kind == ColumnKind::Text => Ok(values
            .into_iter()
            .map(|value| value.map(|v| v.trim().trim_end_matches('%').trim_end().to_string()))
            .collect()),
        Some(ColumnTransform::Percent) | None => Ok(values),
    }
}

/// Coerce string values to `kind`, returning the column and the number of
/// non-null inputs that failed to parse.
fn coerce(
    name: &str,
    values: Vec<Option<String>>,
    kind: ColumnKind,
    transform: Option<ColumnTransform>,
) -> (Column, usize) {
    let parse: fn(&str) -> Option<f64> = if transform == Some(ColumnTransform::Percent) {
        parse_percent
    } else {
        parse_numeric
    };
    let mut unparsed = 0usize;
    match kind {
        ColumnKind::Text => (Column::new(name.into(), values), 0),
        ColumnKind::Float => {
            let parsed: Vec<Option<f64>> = values
                .iter()
                .map(|value| {
                    let value = value.as_deref()?;
                    let number = parse(value);
                    if number.is_none() {
                        unparsed += 1;
                    }
                    number
                })
                .collect();
            (Column::new(name.into(), parsed), unparsed)
        }
        ColumnKind::Int => {
            let parsed: Vec<Option<i64>> = values
                .iter()
                .map(|value| {
                    let value = value.as_deref()?;
                    let number = parse(value).filter(|n| n.fract() == 0.0).map(|n| n as i64);
                    if number.is_none() {
                        unparsed += 1;
                    }
                    number
                })
                .collect();
            (Column::new(name.into(), parsed), unparsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
        let cols: Vec<Column> = columns
            .into_iter()
            .map(|(name, values)| Column::new(name.into(), values))
            .collect();
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn unlisted_columns_are_dropped_and_renamed() {
        let df = text_frame(vec![
            ("ST", vec![Some("6")]),
            ("CO", vec![Some("37")]),
            ("NOTE", vec![Some("drop me")]),
        ]);
        let specs = vec![
            ColumnSpec::text("ST", "state_fips").with_transform(ColumnTransform::ZeroPad(2)),
            ColumnSpec::text("CO", "county_fips").with_transform(ColumnTransform::ZeroPad(3)),
        ];
        let out = select_columns(&df, &specs, "geo").unwrap();
        let names: Vec<String> = out
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["state_fips", "county_fips"]);
        assert_eq!(out.column("state_fips").unwrap().str().unwrap().get(0), Some("06"));
        assert_eq!(out.column("county_fips").unwrap().str().unwrap().get(0), Some("037"));
    }

    #[test]
    fn missing_source_column_is_schema_error() {
        let df = text_frame(vec![("ST", vec![Some("6")])]);
        let specs = vec![ColumnSpec::text("COUNTY", "county_fips")];
        let err = select_columns(&df, &specs, "geo").unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn { column, .. } if column == "COUNTY"));
    }

    #[test]
    fn bad_fips_is_fatal() {
        let df = text_frame(vec![("ST", vec![Some("CA")])]);
        let specs =
            vec![ColumnSpec::text("ST", "state_fips").with_transform(ColumnTransform::ZeroPad(2))];
        let err = select_columns(&df, &specs, "geo").unwrap_err();
        assert!(matches!(err, TransformError::InvalidFips { value, .. } if value == "CA"));
    }

    #[test]
    fn numbers_are_coerced_leniently() {
        let df = text_frame(vec![
            ("POP", vec![Some("1,234"), Some("n/a"), None]),
            ("INC", vec![Some("250,000+"), Some("51000"), Some("12.5")]),
            ("PCT", vec![Some("23.4%"), None, Some("7%")]),
        ]);
        let specs = vec![
            ColumnSpec::int("POP", "population"),
            ColumnSpec::float("INC", "income"),
            ColumnSpec::float("PCT", "pct").with_transform(ColumnTransform::Percent),
        ];
        let out = select_columns(&df, &specs, "acs").unwrap();
        let pop = out.column("population").unwrap().i64().unwrap();
        assert_eq!(pop.get(0), Some(1234));
        assert_eq!(pop.get(1), None);
        assert_eq!(pop.get(2), None);
        let income = out.column("income").unwrap().f64().unwrap();
        assert_eq!(income.get(0), Some(250_000.0));
        assert_eq!(income.get(2), Some(12.5));
        let pct = out.column("pct").unwrap().f64().unwrap();
        assert_eq!(pct.get(0), Some(23.4));
        assert_eq!(pct.get(2), Some(7.0));
    }

    #[test]
    fn trim_collapses_whitespace() {
        let df = text_frame(vec![("NAME", vec![Some("  Region   1 ")])]);
        let specs = vec![ColumnSpec::text("NAME", "substate_region_name")
            .with_transform(ColumnTransform::Trim)];
        let out = select_columns(&df, &specs, "geo").unwrap();
        assert_eq!(
            out.column("substate_region_name").unwrap().str().unwrap().get(0),
            Some("Region 1")
        );
    }
}
