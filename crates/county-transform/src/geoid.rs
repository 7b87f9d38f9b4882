//! Geographic identifier splitting for ACS tables.

use polars::prelude::*;

use county_ingest::column_strings;
use county_model::keys::{COUNTY_FIPS, STATE_FIPS};
use county_model::{ModelError, split_geo_id};

use crate::error::{Result, TransformError};

/// Replace the identifier column `source` with `state_fips` and `county_fips`.
///
/// The key columns are placed first; the remaining columns keep their order.
/// A null or malformed identifier is fatal.
pub fn split_geo_id_column(df: &DataFrame, source: &str, table: &str) -> Result<DataFrame> {
    if df.column(source).is_err() {
        return Err(TransformError::MissingColumn {
            table: table.to_string(),
            column: source.to_string(),
        });
    }

    let ids = column_strings(df, source)?;
    let mut states = Vec::with_capacity(ids.len());
    let mut counties = Vec::with_capacity(ids.len());
    for (row, id) in ids.into_iter().enumerate() {
        let Some(id) = id else {
            return Err(TransformError::MalformedGeoId {
                table: table.to_string(),
                value: String::new(),
                reason: format!("missing identifier in row {}", row + 1),
            });
        };
        let key = split_geo_id(&id).map_err(|err| {
            let reason = match err {
                ModelError::MalformedGeoId { reason, .. } | ModelError::InvalidFips { reason, .. } => {
                    reason
                }
                other => other.to_string(),
            };
            TransformError::MalformedGeoId {
                table: table.to_string(),
                value: id.clone(),
                reason,
            }
        })?;
        states.push(key.state.as_str().to_string());
        counties.push(key.county.as_str().to_string());
    }

    let mut columns = vec![
        Column::new(STATE_FIPS.into(), states),
        Column::new(COUNTY_FIPS.into(), counties),
    ];
    for column in df.get_columns() {
        if column.name().as_str() != source {
            columns.push(column.clone());
        }
    }
    Ok(DataFrame::new(columns)?)
}
