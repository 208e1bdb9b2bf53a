//! Terminal summaries printed after each successful subcommand.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::{AggregateOutcome, CurateOutcome, DownloadOutcome, ExtractOutcome};

pub fn print_download_summary(outcome: &DownloadOutcome) {
    println!("Corpus: {}", outcome.corpus_path.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Pages"),
        header_cell("Records"),
        header_cell("Reported total"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for stage in &outcome.summary.stages {
        table.add_row(vec![
            Cell::new(stage.stage),
            Cell::new(stage.pages),
            Cell::new(stage.records),
            match stage.reported_total {
                Some(total) => Cell::new(total),
                None => dim_cell("-"),
            },
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(outcome.summary.raw_count).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    println!(
        "Unique studies: {} ({} raw)",
        outcome.summary.unique_count, outcome.summary.raw_count
    );
}

pub fn print_extract_summary(outcome: &ExtractOutcome) {
    println!("Field extractions: {}", outcome.output_file.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Read"),
        header_cell("Extracted"),
        header_cell("Retained (DRUG)"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(outcome.summary.read),
        Cell::new(outcome.summary.extracted),
        count_cell(outcome.summary.retained),
    ]);
    println!("{table}");
}

pub fn print_curate_summary(outcome: &CurateOutcome) {
    println!("Curated table: {}", outcome.curated_path.display());
    println!("Selection rules: {}", outcome.rules_path.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Resource table"),
        header_cell("Lookup field"),
        header_cell("Matched rows"),
        header_cell("Unions"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for stats in &outcome.stats {
        table.add_row(vec![
            Cell::new(&stats.table),
            Cell::new(&stats.lookup_field),
            count_cell(stats.matched_rows),
            count_cell(stats.union_events),
        ]);
    }
    println!("{table}");
    println!(
        "{} instance rows, {} resource tables, {} rules ({} non-empty)",
        outcome.instances, outcome.resource_tables, outcome.rules, outcome.nonempty_rules
    );
}

pub fn print_aggregate_summary(outcome: &AggregateOutcome) {
    println!("Summary table: {}", outcome.output_path.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Trials"),
        header_cell("Columns"),
        header_cell("Dropped (no intervention)"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        count_cell(outcome.trials),
        Cell::new(outcome.columns),
        match outcome.dropped_missing_intervention {
            0 => dim_cell(0),
            dropped => Cell::new(dropped).fg(Color::Yellow),
        },
    ]);
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(value: usize) -> Cell {
    if value > 0 {
        Cell::new(value).fg(Color::Green)
    } else {
        dim_cell(value)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
