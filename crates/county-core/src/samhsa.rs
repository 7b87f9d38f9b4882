//! SAMHSA substate estimate tables.

use std::path::Path;
use std::time::Instant;

use tracing::{info, info_span};

use county_config::{SamhsaConfig, SamhsaTable, resolve_input};
use county_model::keys::{STATE_NAME, SUBSTATE_REGION_NAME};
use county_model::{ColumnSpec, ColumnTransform};
use county_transform::{TableFrame, filter_equals, map_state_names, select_columns};

use crate::error::Result;
use crate::report::{LoadedTable, TableReport};
use crate::sources::{SourceFile, Stage, samhsa_layout, samhsa_required};

/// Rename map shared by every SAMHSA table; only the estimate target varies.
fn indicator_columns(config: &SamhsaConfig, indicator: &str) -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::text(&config.state_column, STATE_NAME).with_transform(ColumnTransform::Trim),
        ColumnSpec::text(&config.region_column, SUBSTATE_REGION_NAME)
            .with_transform(ColumnTransform::Trim),
        ColumnSpec::float(&config.estimate_column, indicator)
            .with_transform(ColumnTransform::Percent),
    ]
}

/// Read one indicator table.
///
/// Output columns: `state_fips`, `substate_region_name`, `<indicator>`.
pub fn load_samhsa_table(
    config: &SamhsaConfig,
    table: &SamhsaTable,
    data_dir: &Path,
    strict_geography: bool,
) -> Result<LoadedTable> {
    let span = info_span!("table", name = %table.name);
    let _guard = span.enter();
    let start = Instant::now();

    let source = SourceFile {
        stage: Stage::Samhsa,
        name: table.name.clone(),
        path: resolve_input(data_dir, &table.file),
        layout: samhsa_layout(config),
        required: samhsa_required(config),
    };
    let raw = source.read()?;
    let source_rows = raw.height();

    let grouped = filter_equals(
        &raw,
        &config.group_column,
        table.group_value(config),
        &table.name,
    )?;
    let selected = select_columns(
        &grouped,
        &indicator_columns(config, &table.indicator),
        &table.name,
    )?;
    let mapping = map_state_names(&selected, STATE_NAME, &table.name, strict_geography)?;

    let rows = mapping.frame.height();
    info!(
        table = %table.name,
        indicator = %table.indicator,
        source_rows,
        rows,
        dropped = mapping.dropped,
        duration_ms = start.elapsed().as_millis(),
        "indicator table loaded"
    );
    Ok(LoadedTable {
        frame: TableFrame::new(&table.name, mapping.frame),
        report: TableReport {
            stage: Stage::Samhsa,
            name: table.name.clone(),
            path: source.path,
            source_rows,
            rows,
            dropped_rows: mapping.dropped,
            unmapped_states: mapping.unmapped,
        },
    })
}

/// Read every configured indicator table, in configuration order.
pub fn load_samhsa(
    config: &SamhsaConfig,
    data_dir: &Path,
    strict_geography: bool,
) -> Result<Vec<LoadedTable>> {
    let span = info_span!("samhsa");
    let _guard = span.enter();
    config
        .tables
        .iter()
        .map(|table| load_samhsa_table(config, table, data_dir, strict_geography))
        .collect()
}
