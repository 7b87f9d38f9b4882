use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use county_core::{CheckStatus, InputCheck, PipelineReport, Stage};

pub fn print_summary(report: &PipelineReport) {
    println!("Data: {}", report.data_dir.display());
    match &report.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    if let Some(path) = &report.manifest {
        println!("Manifest: {}", path.display());
    }
    println!("Join: {}", report.join_mode);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Table"),
        header_cell("Source rows"),
        header_cell("Rows"),
        header_cell("Dropped"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for summary in &report.tables {
        table.add_row(vec![
            stage_cell(summary.stage),
            Cell::new(&summary.name),
            Cell::new(summary.source_rows),
            Cell::new(summary.rows),
            count_cell(summary.dropped_rows, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("BRIDGE").fg(Color::DarkGrey),
        Cell::new("county to region").fg(Color::DarkGrey),
        dim_cell("-"),
        Cell::new(report.bridge_counties),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        Cell::new("OUTPUT")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} columns", report.table.width()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(report.output_rows()).add_attribute(Attribute::Bold),
        count_cell(report.dropped_rows(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let unmapped = unmapped_states(report);
    if !unmapped.is_empty() {
        eprintln!("Dropped state names without FIPS codes: {}", unmapped.join(", "));
    }
}

fn unmapped_states(report: &PipelineReport) -> Vec<&str> {
    let mut names: Vec<&str> = report
        .tables
        .iter()
        .flat_map(|table| table.unmapped_states.iter().map(String::as_str))
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

pub fn print_checks(checks: &[InputCheck]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Table"),
        header_cell("Path"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for check in checks {
        table.add_row(vec![
            stage_cell(check.source.stage),
            Cell::new(&check.source.name),
            Cell::new(check.source.path.display()),
            status_cell(&check.status),
        ]);
    }
    println!("{table}");
}

fn status_cell(status: &CheckStatus) -> Cell {
    match status {
        CheckStatus::Ok { columns } => Cell::new(format!("ok ({columns} columns)")).fg(Color::Green),
        CheckStatus::Missing => Cell::new("missing")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        CheckStatus::Unreadable { message } => Cell::new(format!("unreadable: {message}"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        CheckStatus::MissingColumns { columns } => {
            Cell::new(format!("missing columns: {}", columns.join(", ")))
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn stage_cell(stage: Stage) -> Cell {
    let color = match stage {
        Stage::Geography => Color::Magenta,
        Stage::Samhsa => Color::Blue,
        Stage::Acs => Color::Green,
    };
    Cell::new(stage).fg(color).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
