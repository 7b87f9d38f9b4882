//! State name to FIPS mapping for SAMHSA tables.

use std::collections::BTreeSet;

use polars::prelude::*;
use tracing::warn;

use county_ingest::column_strings;
use county_model::keys::STATE_FIPS;
use county_model::state_fips_for_name;

use crate::error::{Result, TransformError};

/// Result of [`map_state_names`].
#[derive(Debug, Clone)]
pub struct StateMapping {
    /// Frame with `state_fips` first and the name column removed.
    pub frame: DataFrame,
    /// Distinct names without a FIPS code, sorted.
    pub unmapped: Vec<String>,
    /// Number of rows dropped because their name was unmapped.
    pub dropped: usize,
}

/// Replace the state name column `source` with a `state_fips` column.
///
/// Rows whose name has no FIPS code (national or regional aggregates) are
/// dropped and reported. With `strict`, the first such name is an error.
pub fn map_state_names(
    df: &DataFrame,
    source: &str,
    table: &str,
    strict: bool,
) -> Result<StateMapping> {
    if df.column(source).is_err() {
        return Err(TransformError::MissingColumn {
            table: table.to_string(),
            column: source.to_string(),
        });
    }

    let names = column_strings(df, source)?;
    let mut codes = Vec::with_capacity(names.len());
    let mut keep = Vec::with_capacity(names.len());
    let mut unmapped = BTreeSet::new();
    for name in names {
        let code = name.as_deref().and_then(state_fips_for_name);
        match code {
            Some(code) => {
                codes.push(Some(code.as_str().to_string()));
                keep.push(true);
            }
            None => {
                let name = name.unwrap_or_default().trim().to_string();
                if strict {
                    return Err(TransformError::UnmappedState {
                        table: table.to_string(),
                        name,
                    });
                }
                unmapped.insert(name);
                codes.push(None);
                keep.push(false);
            }
        }
    }

    let mut columns = vec![Column::new(STATE_FIPS.into(), codes)];
    for column in df.get_columns() {
        if column.name().as_str() != source {
            columns.push(column.clone());
        }
    }
    let mapped = DataFrame::new(columns)?;
    let dropped = keep.iter().filter(|kept| !**kept).count();
    let frame = if dropped == 0 {
        mapped
    } else {
        let unmapped_list: Vec<&str> = unmapped.iter().map(String::as_str).collect();
        warn!(
            table,
            dropped,
            names = %unmapped_list.join(", "),
            "dropped rows with unmapped state names"
        );
        mapped.filter(&BooleanChunked::new("mapped".into(), &keep))?
    };

    Ok(StateMapping {
        frame,
        unmapped: unmapped.into_iter().collect(),
        dropped,
    })
}
