//! County pipeline with explicit stages.
//!
//! The pipeline runs these stages in order:
//! 1. **Geography**: read the reference tables, build the county bridge
//! 2. **SAMHSA**: read, filter and key every indicator table
//! 3. **ACS**: read, select and key every subject table
//! 4. **Join**: combine everything into one row per county
//! 5. **Output**: write the CSV and the run manifest
//!
//! Each stage takes the output of the previous stage and returns new tables.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, info_span, warn};

use county_config::{PipelineConfig, resolve_data_dir, resolve_input};
use county_model::JoinMode;
use county_transform::TableFrame;

use crate::acs::load_acs;
use crate::error::Result;
use crate::geography::{county_region_bridge, load_geography};
use crate::joiner::join_county_table;
use crate::output::{RunManifest, manifest_path, write_table_csv};
use crate::report::{LoadedTable, PipelineReport, TableReport};
use crate::samhsa::load_samhsa;
use crate::sources::Stage;

/// Per-run overrides of the configuration.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Overrides `paths.data_dir` and the environment variable.
    pub data_dir: Option<PathBuf>,
    /// Overrides `paths.output`.
    pub output: Option<PathBuf>,
    /// Overrides `join.mode`.
    pub join_mode: Option<JoinMode>,
    /// Forces strict state mapping on top of `join.strict_geography`.
    pub strict_geography: bool,
    /// Build the table without writing anything.
    pub dry_run: bool,
    pub write_manifest: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            data_dir: None,
            output: None,
            join_mode: None,
            strict_geography: false,
            dry_run: false,
            write_manifest: true,
        }
    }
}

/// Run every stage and write the county table.
pub fn run_pipeline(config: &PipelineConfig, options: &RunOptions) -> Result<PipelineReport> {
    let run_start = Instant::now();
    let data_dir = resolve_data_dir(options.data_dir.as_deref(), &config.paths.data_dir);
    let join_mode = options.join_mode.unwrap_or(config.join.mode);
    let strict = options.strict_geography || config.join.strict_geography;
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| config.paths.output.clone());
    info!(
        data_dir = %data_dir.display(),
        join_mode = %join_mode,
        strict_geography = strict,
        dry_run = options.dry_run,
        "pipeline started"
    );

    // Stage 1: Geography
    let geography = load_geography(&config.geography, &data_dir)?;
    let bridge = info_span!("geography").in_scope(|| county_region_bridge(&geography))?;
    let mut tables = vec![TableReport {
        stage: Stage::Geography,
        name: "county".to_string(),
        path: resolve_input(&data_dir, &config.geography.county.file),
        source_rows: geography.county_source_rows,
        rows: geography.counties.height(),
        dropped_rows: 0,
        unmapped_states: Vec::new(),
    }];
    if let (Some(tract_config), Some(tracts)) = (&config.geography.tract, &geography.tracts) {
        tables.push(TableReport {
            stage: Stage::Geography,
            name: "tract".to_string(),
            path: resolve_input(&data_dir, &tract_config.file),
            source_rows: geography.tract_source_rows,
            rows: tracts.height(),
            dropped_rows: 0,
            unmapped_states: Vec::new(),
        });
    }

    // Stage 2: SAMHSA
    let samhsa = load_samhsa(&config.samhsa, &data_dir, strict)?;
    let unmapped: Vec<&str> = {
        let mut names: Vec<&str> = samhsa
            .iter()
            .flat_map(|table| table.report.unmapped_states.iter().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    };
    if !unmapped.is_empty() {
        warn!(
            names = %unmapped.join(", "),
            "state names without FIPS codes were dropped from indicator tables"
        );
    }

    // Stage 3: ACS
    let acs = load_acs(&config.acs, &data_dir)?;

    // Stage 4: Join
    let (indicator_frames, indicator_reports) = split_loaded(samhsa);
    let (acs_frames, acs_reports) = split_loaded(acs);
    tables.extend(indicator_reports);
    tables.extend(acs_reports);
    let joined = join_county_table(&bridge, &indicator_frames, &acs_frames, join_mode)?;

    let mut report = PipelineReport {
        data_dir,
        join_mode,
        tables,
        bridge_counties: bridge.height(),
        indicator_rows: joined.indicators.record_count(),
        acs_rows: joined.acs.record_count(),
        table: joined.table,
        output: None,
        manifest: None,
    };

    // Stage 5: Output
    if options.dry_run {
        info!(rows = report.output_rows(), "dry run, nothing written");
    } else {
        let span = info_span!("output");
        let _guard = span.enter();
        write_table_csv(&report.table, &output)?;
        if options.write_manifest {
            let manifest =
                RunManifest::build(join_mode.as_str(), &report.tables, &output, &report.table)?;
            let path = manifest_path(&output);
            manifest.write(&path)?;
            report.manifest = Some(path);
        }
        report.output = Some(output);
    }

    info!(
        rows = report.output_rows(),
        columns = report.table.width(),
        dropped_rows = report.dropped_rows(),
        duration_ms = run_start.elapsed().as_millis(),
        "pipeline finished"
    );
    Ok(report)
}

fn split_loaded(loaded: Vec<LoadedTable>) -> (Vec<TableFrame>, Vec<TableReport>) {
    loaded
        .into_iter()
        .map(|table| (table.frame, table.report))
        .unzip()
}
