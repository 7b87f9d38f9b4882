//! Polars AnyValue utility functions.
//!
//! Helpers for turning cells into strings for output and for parsing the
//! loosely formatted numbers found in survey extracts.

use polars::prelude::*;

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null, formats floats without trailing zeros.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number without trailing fractional zeros.
///
/// ```
/// use county_ingest::format_numeric;
///
/// assert_eq!(format_numeric(23.40), "23.4");
/// assert_eq!(format_numeric(100.0), "100");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Parses a string as a finite f64; invalid, empty, NaN and infinite values
/// are None.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a numeric cell the way Census extracts write them.
///
/// Thousands separators are removed, and the top/bottom coding markers on
/// medians (`250,000+`, `2,500-`) are stripped so the bound itself is kept.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let unsigned = trimmed
        .strip_suffix('+')
        .or_else(|| trimmed.strip_suffix('-'))
        .unwrap_or(trimmed);
    let cleaned: String = unsigned.chars().filter(|ch| *ch != ',').collect();
    parse_f64(&cleaned)
}

/// Parses a percentage cell into percentage points (`"23.4%"` -> `23.4`).
pub fn parse_percent(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed);
    parse_numeric(number)
}

/// Collects a column's values as owned strings, formatting non-string cells.
pub fn column_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx)?;
        values.push(match value {
            AnyValue::Null => None,
            other => Some(any_to_string(other)),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_without_trailing_zeros() {
        assert_eq!(format_numeric(23.4), "23.4");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(0.5), "0.5");
        assert_eq!(format_numeric(-3.0), "-3");
    }

    #[test]
    fn parses_census_numbers() {
        assert_eq!(parse_numeric("1,234"), Some(1234.0));
        assert_eq!(parse_numeric("250,000+"), Some(250_000.0));
        assert_eq!(parse_numeric("2,500-"), Some(2500.0));
        assert_eq!(parse_numeric("-12.5"), Some(-12.5));
        assert_eq!(parse_numeric("N/A"), None);
        assert_eq!(parse_numeric(""), None);
    }

    #[test]
    fn non_finite_values_are_unparsed() {
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_numeric("-infinity"), None);
        assert_eq!(parse_percent("NaN%"), None);
        assert_eq!(parse_f64("1e3"), Some(1000.0));
    }

    #[test]
    fn parses_percentages_as_points() {
        assert_eq!(parse_percent("23.4%"), Some(23.4));
        assert_eq!(parse_percent(" 7% "), Some(7.0));
        assert_eq!(parse_percent("23.4"), Some(23.4));
        assert_eq!(parse_percent("*"), None);
    }

    #[test]
    fn any_value_strings() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Int64(42)), "42");
        assert_eq!(any_to_string(AnyValue::Float64(19.50)), "19.5");
        assert_eq!(any_to_string(AnyValue::String("Ohio")), "Ohio");
    }

    #[test]
    fn column_strings_keeps_nulls() {
        let df = DataFrame::new(vec![Column::new(
            "pct".into(),
            vec![Some(1.5f64), None, Some(2.0)],
        )])
        .unwrap();
        assert_eq!(
            column_strings(&df, "pct").unwrap(),
            vec![Some("1.5".to_string()), None, Some("2".to_string())]
        );
    }
}
