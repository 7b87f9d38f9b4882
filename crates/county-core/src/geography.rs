//! Geography reference loading and the county-to-region bridge.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use polars::prelude::*;
use tracing::{info, info_span, warn};

use county_config::GeographyConfig;
use county_ingest::column_strings;
use county_model::ColumnSpec;
use county_model::keys::{COUNTY_FIPS, STATE_FIPS, SUBSTATE_REGION_ID, SUBSTATE_REGION_NAME};
use county_transform::select_columns;

use crate::error::Result;
use crate::sources::{SourceFile, reference_source};

/// The normalized reference tables.
#[derive(Debug, Clone)]
pub struct Geography {
    /// County to substate region rows, FIPS codes zero-padded.
    pub counties: DataFrame,
    /// Tract to substate region rows, when configured.
    pub tracts: Option<DataFrame>,
    /// Rows read from the county reference file.
    pub county_source_rows: usize,
    /// Rows read from the tract reference file.
    pub tract_source_rows: usize,
}

/// Read and normalize the geography reference tables.
pub fn load_geography(config: &GeographyConfig, data_dir: &Path) -> Result<Geography> {
    let span = info_span!("geography");
    let _guard = span.enter();
    let start = Instant::now();

    let county_source = reference_source("county", &config.county, data_dir);
    let (counties, county_source_rows) = load_reference(&county_source, &config.county.columns)?;

    let (tracts, tract_source_rows) = match &config.tract {
        Some(tract) => {
            let source = reference_source("tract", tract, data_dir);
            let (frame, rows) = load_reference(&source, &tract.columns)?;
            (Some(frame), rows)
        }
        None => (None, 0),
    };

    info!(
        counties = counties.height(),
        tracts = tracts.as_ref().map_or(0, DataFrame::height),
        duration_ms = start.elapsed().as_millis(),
        "geography loaded"
    );
    Ok(Geography {
        counties,
        tracts,
        county_source_rows,
        tract_source_rows,
    })
}

fn load_reference(source: &SourceFile, columns: &[ColumnSpec]) -> Result<(DataFrame, usize)> {
    let raw = source.read()?;
    let rows = raw.height();
    let frame = select_columns(&raw, columns, &source.name)?;
    info!(table = %source.name, path = %source.path.display(), rows, "reference table loaded");
    Ok((frame, rows))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    id: String,
    name: String,
}

/// Orders region ids numerically when both parse, textually otherwise.
fn compare_region_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Resolve every county to exactly one substate region.
///
/// A county listed under several regions goes to the region holding most of
/// its tracts; ties, and counties without tracts, go to the smallest region
/// id. Output columns: `state_fips`, `county_fips`, `substate_region_id`,
/// `substate_region_name`, sorted by county.
pub fn county_region_bridge(geography: &Geography) -> Result<DataFrame> {
    let counties = &geography.counties;
    let states = column_strings(counties, STATE_FIPS)?;
    let county_codes = column_strings(counties, COUNTY_FIPS)?;
    let region_ids = column_strings(counties, SUBSTATE_REGION_ID)?;
    let region_names = column_strings(counties, SUBSTATE_REGION_NAME)?;

    let mut candidates: BTreeMap<(String, String), Vec<Region>> = BTreeMap::new();
    let mut incomplete = 0usize;
    for idx in 0..counties.height() {
        let (Some(state), Some(county), Some(id), Some(name)) = (
            states[idx].clone(),
            county_codes[idx].clone(),
            region_ids[idx].clone(),
            region_names[idx].clone(),
        ) else {
            incomplete += 1;
            continue;
        };
        let regions = candidates.entry((state, county)).or_default();
        let region = Region { id, name };
        if !regions.contains(&region) {
            regions.push(region);
        }
    }
    if incomplete > 0 {
        warn!(rows = incomplete, "skipped county reference rows with missing fields");
    }

    let tract_counts = match &geography.tracts {
        Some(tracts) => count_tracts(tracts)?,
        None => BTreeMap::new(),
    };

    let mut out_state = Vec::with_capacity(candidates.len());
    let mut out_county = Vec::with_capacity(candidates.len());
    let mut out_id = Vec::with_capacity(candidates.len());
    let mut out_name = Vec::with_capacity(candidates.len());
    let mut split = 0usize;
    for ((state, county), regions) in candidates {
        if regions.len() > 1 {
            split += 1;
        }
        let chosen = regions.into_iter().max_by(|a, b| {
            let count = |region: &Region| {
                tract_counts
                    .get(&(state.clone(), county.clone(), region.id.clone()))
                    .copied()
                    .unwrap_or(0)
            };
            count(a)
                .cmp(&count(b))
                .then_with(|| compare_region_ids(&b.id, &a.id))
        });
        let Some(region) = chosen else {
            continue;
        };
        out_state.push(state);
        out_county.push(county);
        out_id.push(region.id);
        out_name.push(region.name);
    }
    info!(
        counties = out_state.len(),
        split_counties = split,
        "county bridge built"
    );

    Ok(DataFrame::new(vec![
        Column::new(STATE_FIPS.into(), out_state),
        Column::new(COUNTY_FIPS.into(), out_county),
        Column::new(SUBSTATE_REGION_ID.into(), out_id),
        Column::new(SUBSTATE_REGION_NAME.into(), out_name),
    ])?)
}

fn count_tracts(tracts: &DataFrame) -> Result<BTreeMap<(String, String, String), usize>> {
    let states = column_strings(tracts, STATE_FIPS)?;
    let counties = column_strings(tracts, COUNTY_FIPS)?;
    let regions = column_strings(tracts, SUBSTATE_REGION_ID)?;
    let mut counts = BTreeMap::new();
    for ((state, county), region) in states.into_iter().zip(counties).zip(regions) {
        if let (Some(state), Some(county), Some(region)) = (state, county, region) {
            *counts.entry((state, county, region)).or_insert(0usize) += 1;
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(name: &str, values: &[&str]) -> Column {
        Column::new(name.into(), values.to_vec())
    }

    fn geography(tracts: Option<DataFrame>) -> Geography {
        let counties = DataFrame::new(vec![
            strings(STATE_FIPS, &["06", "06", "06", "06", "06"]),
            strings(COUNTY_FIPS, &["037", "037", "001", "001", "001"]),
            strings(SUBSTATE_REGION_ID, &["2", "10", "3", "4", "4"]),
            strings(
                SUBSTATE_REGION_NAME,
                &["Region 2", "Region 10", "Region 3", "Region 4", "Region 4"],
            ),
        ])
        .unwrap();
        Geography {
            counties,
            tracts,
            county_source_rows: 5,
            tract_source_rows: 0,
        }
    }

    fn names(df: &DataFrame) -> Vec<Option<String>> {
        column_strings(df, SUBSTATE_REGION_NAME).unwrap()
    }

    #[test]
    fn majority_of_tracts_decides_region() {
        let tracts = DataFrame::new(vec![
            strings(STATE_FIPS, &["06", "06", "06", "06"]),
            strings(COUNTY_FIPS, &["037", "037", "037", "001"]),
            strings(SUBSTATE_REGION_ID, &["10", "10", "2", "4"]),
        ])
        .unwrap();
        let bridge = county_region_bridge(&geography(Some(tracts))).unwrap();
        assert_eq!(bridge.height(), 2);
        // Sorted by county: 001 then 037.
        assert_eq!(
            names(&bridge),
            vec![Some("Region 4".to_string()), Some("Region 10".to_string())]
        );
    }

    #[test]
    fn smallest_region_id_without_tracts() {
        let bridge = county_region_bridge(&geography(None)).unwrap();
        assert_eq!(
            names(&bridge),
            vec![Some("Region 3".to_string()), Some("Region 2".to_string())]
        );
        let ids = column_strings(&bridge, SUBSTATE_REGION_ID).unwrap();
        assert_eq!(ids, vec![Some("3".to_string()), Some("2".to_string())]);
    }

    #[test]
    fn region_ids_compare_numerically() {
        assert_eq!(compare_region_ids("2", "10"), Ordering::Less);
        assert_eq!(compare_region_ids("A", "B"), Ordering::Less);
    }

    #[test]
    fn bridge_without_region_names_is_a_schema_error() {
        let mut geo = geography(None);
        geo.counties = geo.counties.drop(SUBSTATE_REGION_NAME).unwrap();
        let err = county_region_bridge(&geo).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Schema);
    }
}
