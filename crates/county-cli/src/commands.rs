use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tracing::info_span;

use county_cli::cli::{CheckArgs, RunArgs, TablesArgs};
use county_config::{PipelineConfig, load_or_default, resolve_data_dir};
use county_core::{PipelineReport, RunOptions, check_inputs, run_pipeline};
use county_model::ColumnSpec;

use crate::summary::{apply_table_style, header_cell, print_checks};

fn load_config(path: Option<&std::path::Path>) -> Result<PipelineConfig> {
    let config = load_or_default(path).with_context(|| match path {
        Some(path) => format!("load pipeline config {}", path.display()),
        None => "load built-in pipeline config".to_string(),
    })?;
    Ok(config)
}

pub fn run(args: &RunArgs) -> Result<PipelineReport> {
    let span = info_span!("run");
    let _guard = span.enter();
    let config = load_config(args.config.as_deref())?;
    let options = RunOptions {
        data_dir: args.data_dir.clone(),
        output: args.output.clone(),
        join_mode: args.join.map(Into::into),
        strict_geography: args.strict_geography,
        dry_run: args.dry_run,
        write_manifest: !args.no_manifest,
    };
    let report = run_pipeline(&config, &options).context("run county pipeline")?;
    Ok(report)
}

/// Returns whether every input passed.
pub fn check(args: &CheckArgs) -> Result<bool> {
    let config = load_config(args.config.as_deref())?;
    let data_dir = resolve_data_dir(args.data_dir.as_deref(), &config.paths.data_dir);
    println!("Data: {}", data_dir.display());
    let checks = check_inputs(&config, &data_dir);
    print_checks(&checks);
    let failed = checks.iter().filter(|check| !check.status.is_ok()).count();
    if failed > 0 {
        eprintln!("{failed} of {} inputs failed the check", checks.len());
    }
    Ok(failed == 0)
}

pub fn tables(args: &TablesArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    if args.json {
        let json = serde_json::to_string_pretty(&config).context("serialize pipeline config")?;
        println!("{json}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Table"),
        header_cell("File"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);

    table.add_row(vec![
        Cell::new("geography"),
        Cell::new("county"),
        Cell::new(config.geography.county.file.display()),
        Cell::new(column_map(&config.geography.county.columns)),
    ]);
    if let Some(tract) = &config.geography.tract {
        table.add_row(vec![
            Cell::new("geography"),
            Cell::new("tract"),
            Cell::new(tract.file.display()),
            Cell::new(column_map(&tract.columns)),
        ]);
    }
    let samhsa = &config.samhsa;
    for entry in &samhsa.tables {
        let columns = format!(
            "{} -> state_fips\n{} -> substate_region_name\n{} -> {} (where {} = {})",
            samhsa.state_column,
            samhsa.region_column,
            samhsa.estimate_column,
            entry.indicator,
            samhsa.group_column,
            entry.group_value(samhsa),
        );
        table.add_row(vec![
            Cell::new("samhsa"),
            Cell::new(&entry.name),
            Cell::new(entry.file.display()),
            Cell::new(columns),
        ]);
    }
    for entry in &config.acs.tables {
        let columns = format!(
            "{} -> state_fips, county_fips\n{}",
            config.acs.geo_id_column,
            column_map(&entry.columns)
        );
        table.add_row(vec![
            Cell::new("acs"),
            Cell::new(&entry.name),
            Cell::new(entry.file.display()),
            Cell::new(columns),
        ]);
    }
    println!("Join: {}", config.join.mode);
    println!("{table}");
    Ok(())
}

fn column_map(columns: &[ColumnSpec]) -> String {
    columns
        .iter()
        .map(|spec| {
            let mut line = format!("{} -> {} ({})", spec.source, spec.target, spec.kind);
            if let Some(transform) = spec.transform {
                line.push_str(&format!(" [{transform}]"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
