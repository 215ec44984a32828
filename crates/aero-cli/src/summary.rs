use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use aero_model::RunStats;

use crate::types::EtlResult;

pub fn print_summary(result: &EtlResult) {
    let outcome = &result.outcome;
    println!("Run: {}", outcome.timestamp);
    if let Some(path) = &outcome.report_path {
        println!("Run report: {}", path.display());
    }
    for written in &outcome.rejection_reports {
        println!("Rejection report: {}", written.errors_csv.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Feed"),
        header_cell("Source"),
        header_cell("Processed"),
        header_cell("Valid"),
        header_cell("Rejected"),
        header_cell("Loaded"),
        header_cell("Load errors"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_rejected = 0usize;
    let mut total_load_errors = 0usize;
    for stats in &outcome.stats {
        if !stats.is_failed() {
            total_rejected += stats.error_records;
            total_load_errors += stats.load_error_count;
        }
        table.add_row(feed_row(stats));
    }
    let summary = &outcome.summary;
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{:.2}% valid", summary.success_rate))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total_processed).add_attribute(Attribute::Bold),
        Cell::new(summary.total_valid).add_attribute(Attribute::Bold),
        count_cell(total_rejected, Color::Red).add_attribute(Attribute::Bold),
        Cell::new(summary.total_loaded).add_attribute(Attribute::Bold),
        count_cell(total_load_errors, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let counts = result.store_counts;
    println!(
        "Store: {} passengers, {} documents, {} flights, {} fares",
        counts.passengers, counts.documents, counts.flights, counts.fares
    );
    for skipped in &outcome.skipped {
        println!("Skipped: {}", skipped.display());
    }

    let failed: Vec<&RunStats> = outcome.stats.iter().filter(|s| s.is_failed()).collect();
    if !failed.is_empty() {
        eprintln!("Errors:");
        for stats in failed {
            if let Some(failure) = &stats.failure {
                eprintln!("- {} ({}): {failure}", stats.feed, source_label(stats));
            }
        }
    }
}

fn feed_row(stats: &RunStats) -> Vec<Cell> {
    let feed_cell = Cell::new(stats.feed)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold);
    if stats.is_failed() {
        return vec![
            feed_cell,
            Cell::new(source_label(stats)),
            Cell::new("FAILED")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ];
    }
    vec![
        feed_cell,
        Cell::new(source_label(stats)),
        Cell::new(stats.total_processed),
        Cell::new(stats.valid_records),
        count_cell(stats.error_records, Color::Red),
        Cell::new(stats.loaded()),
        count_cell(stats.load_error_count, Color::Yellow),
    ]
}

fn source_label(stats: &RunStats) -> &str {
    stats.source_file.as_deref().unwrap_or("-")
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
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

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
