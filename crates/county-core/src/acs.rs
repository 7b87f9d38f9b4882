//! ACS subject tables.

use std::path::Path;
use std::time::Instant;

use tracing::{info, info_span};

use county_config::{AcsConfig, AcsTable, resolve_input};
use county_model::ColumnSpec;
use county_model::keys::GEO_ID;
use county_transform::{TableFrame, select_columns, split_geo_id_column};

use crate::error::Result;
use crate::report::{LoadedTable, TableReport};
use crate::sources::{SourceFile, Stage, acs_layout, acs_required};

/// Read one subject table.
///
/// Output columns: `state_fips`, `county_fips`, then the allowlisted fields
/// in configuration order.
pub fn load_acs_table(config: &AcsConfig, table: &AcsTable, data_dir: &Path) -> Result<LoadedTable> {
    let span = info_span!("table", name = %table.name);
    let _guard = span.enter();
    let start = Instant::now();

    let source = SourceFile {
        stage: Stage::Acs,
        name: table.name.clone(),
        path: resolve_input(data_dir, &table.file),
        layout: acs_layout(config),
        required: acs_required(config, table),
    };
    let raw = source.read()?;
    let source_rows = raw.height();

    let mut specs = Vec::with_capacity(table.columns.len() + 1);
    specs.push(ColumnSpec::text(&config.geo_id_column, GEO_ID));
    specs.extend(table.columns.iter().cloned());
    let selected = select_columns(&raw, &specs, &table.name)?;
    let keyed = split_geo_id_column(&selected, GEO_ID, &table.name)?;

    let rows = keyed.height();
    info!(
        table = %table.name,
        source_rows,
        rows,
        fields = table.columns.len(),
        duration_ms = start.elapsed().as_millis(),
        "subject table loaded"
    );
    Ok(LoadedTable {
        frame: TableFrame::new(&table.name, keyed),
        report: TableReport {
            stage: Stage::Acs,
            name: table.name.clone(),
            path: source.path,
            source_rows,
            rows,
            dropped_rows: 0,
            unmapped_states: Vec::new(),
        },
    })
}

/// Read every configured subject table, in configuration order.
pub fn load_acs(config: &AcsConfig, data_dir: &Path) -> Result<Vec<LoadedTable>> {
    let span = info_span!("acs");
    let _guard = span.enter();
    config
        .tables
        .iter()
        .map(|table| load_acs_table(config, table, data_dir))
        .collect()
}
