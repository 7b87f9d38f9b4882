//! Assembly of the county table from the stage outputs.

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use county_model::JoinMode;
use county_model::keys::{COUNTY_KEY, REGION_KEY};
use county_transform::{TableFrame, join_all, join_frames, sort_by_keys};

use crate::error::Result;

/// Intermediate and final tables of the join stage.
#[derive(Debug, Clone)]
pub struct JoinedTables {
    /// All indicator tables on the region key.
    pub indicators: TableFrame,
    /// Indicators bridged onto counties.
    pub county_indicators: TableFrame,
    /// All subject tables on the county key.
    pub acs: TableFrame,
    /// Final table, sorted by county.
    pub table: DataFrame,
}

/// Join indicator and subject tables into one row per county.
///
/// Steps, each using `mode`:
/// 1. indicator tables on (`state_fips`, `substate_region_name`)
/// 2. county bridge with the indicators on the same key
/// 3. subject tables on (`state_fips`, `county_fips`)
/// 4. county indicators with the subject tables on the county key
pub fn join_county_table(
    bridge: &DataFrame,
    indicators: &[TableFrame],
    acs: &[TableFrame],
    mode: JoinMode,
) -> Result<JoinedTables> {
    let span = info_span!("join", mode = %mode);
    let _guard = span.enter();
    let start = Instant::now();

    let combined_indicators = join_all(indicators, &REGION_KEY, mode, "samhsa")?;
    let bridge = TableFrame::new("geography", bridge.clone());
    let county_indicators = join_frames(&bridge, &combined_indicators, &REGION_KEY, mode)?;
    let combined_acs = join_all(acs, &COUNTY_KEY, mode, "acs")?;
    let joined = join_frames(&county_indicators, &combined_acs, &COUNTY_KEY, mode)?;
    let table = sort_by_keys(&joined.data, &COUNTY_KEY)?;

    info!(
        indicator_rows = combined_indicators.record_count(),
        county_indicator_rows = county_indicators.record_count(),
        acs_rows = combined_acs.record_count(),
        rows = table.height(),
        columns = table.width(),
        duration_ms = start.elapsed().as_millis(),
        "county table joined"
    );
    Ok(JoinedTables {
        indicators: combined_indicators,
        county_indicators,
        acs: combined_acs,
        table,
    })
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    fn frame(name: &str, columns: Vec<Column>) -> TableFrame {
        TableFrame::new(name, DataFrame::new(columns).unwrap())
    }

    fn text(name: &str, values: &[&str]) -> Column {
        Column::new(name.into(), values.to_vec())
    }

    fn float(name: &str, values: &[f64]) -> Column {
        Column::new(name.into(), values.to_vec())
    }

    fn inputs() -> (DataFrame, Vec<TableFrame>, Vec<TableFrame>) {
        let bridge = DataFrame::new(vec![
            text("state_fips", &["06", "06", "39"]),
            text("county_fips", &["037", "001", "049"]),
            text("substate_region_id", &["2", "1", "7"]),
            text("substate_region_name", &["Region 2", "Region 1", "Region 7"]),
        ])
        .unwrap();
        let ami = frame(
            "ami",
            vec![
                text("state_fips", &["06", "06"]),
                text("substate_region_name", &["Region 1", "Region 2"]),
                float("pct_ami", &[18.0, 19.5]),
            ],
        );
        let income = frame(
            "income",
            vec![
                text("state_fips", &["06", "39", "06"]),
                text("county_fips", &["037", "049", "001"]),
                float("median_income", &[61_000.0, 58_000.0, 90_000.0]),
            ],
        );
        let poverty = frame(
            "poverty",
            vec![
                text("state_fips", &["06"]),
                text("county_fips", &["037"]),
                float("poverty_rate", &[16.3]),
            ],
        );
        (bridge, vec![ami], vec![income, poverty])
    }

    #[test]
    fn inner_join_keeps_fully_covered_counties() {
        let (bridge, indicators, acs) = inputs();
        let joined = join_county_table(&bridge, &indicators, &acs, JoinMode::Inner).unwrap();
        let names: Vec<String> = joined
            .table
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "state_fips",
                "county_fips",
                "substate_region_id",
                "substate_region_name",
                "pct_ami",
                "median_income",
                "poverty_rate"
            ]
        );
        assert_eq!(joined.table.height(), 1);
        let county = joined.table.column("county_fips").unwrap().str().unwrap();
        assert_eq!(county.get(0), Some("037"));
    }

    #[test]
    fn left_join_keeps_every_bridged_county() {
        let (bridge, indicators, acs) = inputs();
        let joined = join_county_table(&bridge, &indicators, &acs, JoinMode::Left).unwrap();
        assert_eq!(joined.table.height(), 3);
        let county = joined.table.column("county_fips").unwrap().str().unwrap();
        assert_eq!(county.get(0), Some("001"));
        assert_eq!(county.get(1), Some("037"));
        assert_eq!(county.get(2), Some("049"));
        let ami = joined.table.column("pct_ami").unwrap().f64().unwrap();
        assert_eq!(ami.get(2), None);
        let poverty = joined.table.column("poverty_rate").unwrap().f64().unwrap();
        assert_eq!(poverty.get(0), None);
        assert_eq!(poverty.get(1), Some(16.3));
    }

    #[test]
    fn repeated_region_rows_are_rejected() {
        let (bridge, _, acs) = inputs();
        let ami = frame(
            "ami",
            vec![
                text("state_fips", &["06", "06"]),
                text("substate_region_name", &["Region 1", "Region 1"]),
                float("pct_ami", &[4.0, 5.0]),
            ],
        );
        let smi = frame(
            "smi",
            vec![
                text("state_fips", &["06"]),
                text("substate_region_name", &["Region 1"]),
                float("pct_smi", &[4.2]),
            ],
        );
        let err = join_county_table(&bridge, &[ami, smi], &acs, JoinMode::Left).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Schema);
        assert!(err.to_string().contains("ami"));
    }
}
